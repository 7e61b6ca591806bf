//! Vibe diary library
//!
//! This library records one mood and an optional note per moment, keeps them
//! newest first, derives streaks and mood statistics over rolling windows, and
//! persists everything to local key-value slots with JSON export/import.

mod cli;
mod clock;
mod config;
mod diary;
mod errors;
mod helper;
mod mood;
mod persistence;
mod snapshot;
mod stats;
mod store;
mod types;
mod vibe;

// Re-export key components
pub use cli::*;
pub use clock::*;
pub use config::*;
pub use diary::*;
pub use errors::*;
pub use helper::*;
pub use mood::*;
pub use persistence::*;
pub use snapshot::*;
pub use stats::*;
pub use store::*;
pub use types::*;
pub use vibe::{Period, Settings, VibeEntry, DEFAULT_VIEW};
