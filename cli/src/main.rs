use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Notes(args) => commands::notes::run(args).await,
        Commands::Send(args) => commands::send::run(args).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("quizbot failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
