//! CLI parse: clap types for treesync. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// treesync - incremental one-way directory synchronization
#[derive(Parser)]
#[command(name = "treesync")]
#[command(about = "Incremental one-way directory synchronization with durable indexes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror a source tree into a destination tree
    Sync {
        /// Source path for synchronization
        #[arg(short = 's', long = "source")]
        source: PathBuf,
        /// Destination path for synchronization
        #[arg(short = 'd', long = "dest")]
        destination: PathBuf,
        /// Ignored path pattern (regex, matched against absolute paths)
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,
        /// Destination index file to restore from and keep up to date
        #[arg(short = 'x', long = "index")]
        index: Option<PathBuf>,
        /// Maximum synchronization passes (defaults to sync.retries)
        #[arg(short = 'r', long)]
        retries: Option<u32>,
    },
    /// Enumerate a tree and write its index
    Index {
        /// Path to index
        #[arg(short = 's', long = "source")]
        source: PathBuf,
        /// Index file to write
        #[arg(short = 'x', long = "index")]
        index: PathBuf,
        /// Ignored path pattern (regex)
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,
        /// Compute checksums for every file
        #[arg(short = 'c', long)]
        checksum: bool,
    },
    /// Hash a tree and compare it against an index, writing a diff report
    Verify {
        /// Path to verify
        #[arg(short = 's', long = "source")]
        source: PathBuf,
        /// Index file used for verification
        #[arg(short = 'x', long = "index")]
        index: PathBuf,
        /// Output file for the diff report
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Ignored path pattern (regex)
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,
    },
    /// Bring an index back in line with the tree it describes
    Reconcile {
        /// Tree the index describes
        #[arg(short = 'd', long = "dest")]
        destination: PathBuf,
        /// Index file to reconcile
        #[arg(short = 'x', long = "index")]
        index: PathBuf,
        /// Ignored path pattern (regex)
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,
        /// Compute missing checksums
        #[arg(short = 'c', long)]
        checksum: bool,
        /// Write the index without asking
        #[arg(long)]
        yes: bool,
    },
    /// Show what a sync would change, without changing anything
    Diff {
        #[arg(short = 's', long = "source")]
        source: PathBuf,
        #[arg(short = 'd', long = "dest")]
        destination: PathBuf,
        /// Ignored path pattern (regex)
        #[arg(short = 'i', long = "ignore")]
        ignore: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = DiffFormat::Text)]
        format: DiffFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiffFormat {
    Text,
    Json,
}
