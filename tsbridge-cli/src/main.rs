mod cli;

use clap::Parser;
use cli::CommandLineInterface;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = CommandLineInterface::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
