use color_eyre::Result;
use linda::cli::{parse_args, run_cli_command, version_line, CliCommand};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        println!("{}", version_line());
        return Ok(());
    }

    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(command))
}
