//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sift - Turn bank statements into structured financial analysis
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Bank statement analyzer with OCR and AI structuring", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis pipeline on a statement (PDF or image)
    Analyze {
        /// Bank statement file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Artifact filename prefix (defaults to bank_analysis_<timestamp>)
        #[arg(long)]
        prefix: Option<String>,

        /// Directory to write artifacts into (defaults to current directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Skip writing artifact files
        #[arg(long)]
        no_save: bool,
    },

    /// Extract raw text from a statement without analyzing it
    Extract {
        /// Bank statement file to read
        #[arg(short, long)]
        file: PathBuf,

        /// Write the extracted text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin for browser clients (repeatable)
        #[arg(long)]
        cors_origin: Vec<String>,
    },
}
