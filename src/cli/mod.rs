//! The `linda` command-line client.
//!
//! ```ignore
//! use linda::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! runtime.block_on(run_cli_command(command))?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, usage, CliCommand};
pub use commands::{execute, CliContext};
pub use version::{version_line, VERSION};

use color_eyre::Result;

use crate::config::ClientConfig;

/// Run a CLI command with configuration from the environment.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", usage());
            Ok(())
        }
        command => {
            let ctx = CliContext::new(ClientConfig::from_env())?;
            execute(command, &ctx).await
        }
    }
}
