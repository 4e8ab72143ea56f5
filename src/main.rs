// install-matrix - installer integration-test harness
// Main CLI entry point

use clap::Parser;
use install_matrix::cli::{Cli, CliDispatcher};
use std::process;
use tracing_subscriber::EnvFilter;

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "install_matrix=info",
        _ => "install_matrix=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match CliDispatcher::execute(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(2);
        }
    }
}
