use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(name = "vibe-diary", version, about = "A tiny mood journal")]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the diary data
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Directory for exports
    #[clap(long, value_parser)]
    pub export_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the vibe diary
    #[clap(subcommand)]
    pub command: Commands,
}
