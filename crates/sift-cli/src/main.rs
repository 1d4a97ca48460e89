//! Sift CLI - Bank statement analyzer
//!
//! Usage:
//!   sift analyze --file statement.pdf   Run the full pipeline, save artifacts
//!   sift extract --file statement.png   Extract raw text only
//!   sift serve --port 8000              Start the web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            prefix,
            output_dir,
            no_save,
        } => {
            commands::cmd_analyze(
                commands::connect_ai()?,
                &file,
                prefix.as_deref(),
                output_dir.as_deref(),
                no_save,
            )
            .await
        }
        Commands::Extract { file, output } => {
            commands::cmd_extract(commands::connect_ai()?, &file, output.as_deref()).await
        }
        Commands::Serve {
            port,
            host,
            cors_origin,
        } => commands::cmd_serve(&host, port, cors_origin).await,
    }
}
