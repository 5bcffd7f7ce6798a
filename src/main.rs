use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod export;
mod grouping;
mod matching;
mod parsing;
mod rename;
mod report;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("sample_resolver=debug,info")
    } else {
        EnvFilter::new("sample_resolver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Samples(args) => {
            cli::samples::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Isolates(args) => {
            cli::isolates::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Rename(args) => {
            cli::rename::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Merge(args) => {
            cli::merge::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
