//! Shared aliases and the CLI command set.
use std::path::PathBuf;

use clap::Subcommand;

use crate::{MoodKind, Period, VibeError};

/// A specialized Result type for vibe diary operations.
pub type Result<T> = std::result::Result<T, VibeError>;

/// Available subcommands for the vibe diary
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record today's vibe
    Record {
        /// Mood identifier (see `moods`)
        mood: MoodKind,

        /// Optional note
        #[clap(short, long)]
        notes: Option<String>,

        /// Write the note in an editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Delete a vibe by ID
    Delete {
        /// ID of the vibe to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// List vibes, newest first
    List {
        /// Only vibes inside this window (week, month, all)
        #[clap(short, long, default_value = "all")]
        period: Period,

        /// Limit the number of vibes shown (0 shows everything)
        #[clap(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show statistics for a period
    Stats {
        /// Window to summarize; defaults to the saved period
        #[clap(short, long)]
        period: Option<Period>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show the last seven days
    Timeline,

    /// List the available moods
    Moods,

    /// Search notes and mood labels
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Set the default statistics period
    Period {
        /// week, month or all
        period: Period,
    },

    /// Remember the current view
    View {
        /// View name, e.g. home, history, statistics
        name: String,
    },

    /// Export everything to a JSON backup
    Export {
        /// Output file (defaults to the export directory)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace everything with a JSON backup
    Import {
        /// Path to the backup file
        file: PathBuf,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Delete all vibes and settings
    Clear {
        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },
}
