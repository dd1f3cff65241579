//! Example harness CLI entry point

use clap::Parser;

use interton_examples::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    // Progress goes through the console reporter; the log stream only carries warnings unless asked for more.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .try_init();

    cli::run(cli);
}
