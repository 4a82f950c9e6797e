//! Authentication state: the stored session credential.

pub mod credentials;

pub use credentials::{Credentials, CredentialsManager};
