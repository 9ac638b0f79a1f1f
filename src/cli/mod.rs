//! CLI module for Spor.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Spor - WebVTT Transcript Ingestion
///
/// A local-first CLI tool for parsing WebVTT course transcripts and ingesting
/// them into a vector store. The name "Spor" comes from the Norwegian word
/// for "track."
#[derive(Parser, Debug)]
#[command(name = "spor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest subtitle files into the vector store
    Ingest {
        /// Directory to scan (defaults to ingestion.root_dir from config)
        dir: Option<String>,

        /// Do not scan subdirectories
        #[arg(long)]
        no_recurse: bool,
    },

    /// Parse a single VTT file and print its records
    Parse {
        /// Path to the VTT file
        file: String,

        /// Combine consecutive segments into chunks
        #[arg(long)]
        combine: bool,

        /// Segments per combined chunk
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Output format (json, table)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// List subtitle files under a directory
    Discover {
        /// Directory to scan
        dir: String,

        /// Do not scan subdirectories
        #[arg(long)]
        no_recurse: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
