//! HTTP side of the client: envelope types, request options and [`ApiClient`].

mod client;
mod envelope;
mod request;

pub use client::ApiClient;
pub use envelope::{ApiResponse, BUSINESS_ERROR_CODE, DEFAULT_ERROR_MESSAGE, SESSION_EXPIRED_CODE};
pub use request::RequestConfig;
