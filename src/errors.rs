//! Error types for the vibe diary.
//!
//! Storage problems on the persisted slots are not errors: they degrade to
//! defaults and travel as a [`StorageIssue`](crate::StorageIssue) instead.
//! Everything in this enum is something the caller has to react to.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the vibe diary.
#[derive(Error, Debug)]
pub enum VibeError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A vibe was recorded without choosing a mood.
    #[error("No mood selected")]
    NoMoodSelected,

    /// The identifier does not name one of the known moods.
    #[error("Unknown mood: {value}")]
    UnknownMood { value: String },

    /// The identifier does not name a statistics period.
    #[error("Invalid period: {value} (expected week, month or all)")]
    InvalidPeriod { value: String },

    /// An import document without a usable `vibes` array.
    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
