//! Durable key-value slots for vibes and settings.
//!
//! Nothing in this module fails towards the caller. A missing, unreadable or
//! corrupt slot loads as the default value and the problem is reported as a
//! [`StorageIssue`] inside an [`Outcome`], after being logged.
use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{Result, Settings, VibeEntry, VibeError};

/// Slot holding the vibe list.
pub const VIBES_KEY: &str = "vibe-diary-vibes";
/// Slot holding the settings object.
pub const SETTINGS_KEY: &str = "vibe-diary-settings";

/// A durable string-to-string medium.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        trace!("Reading slot {} from {}", key, path.display());
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(VibeError::Io(e))
            }
        }
    }

    /// Writes through a temporary file in the same directory and renames it
    /// over the slot, so a crash never leaves half a document behind.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.dir.exists() {
            debug!("Creating data directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| {
                error!("Failed to create directory {}: {}", self.dir.display(), e);
                VibeError::DirectoryError {
                    path: self.dir.clone(),
                }
            })?;
        }

        let path = self.slot_path(key);
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            VibeError::Io(e)
        })?;

        temp_file.write_all(value.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            VibeError::Io(e)
        })?;
        temp_file.flush()?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            VibeError::Io(e.error)
        })?;

        trace!("Slot {} written to {}", key, path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove {}: {}", path.display(), e);
                Err(VibeError::Io(e))
            }
        }
    }
}

/// Process-local medium; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// A storage problem that was absorbed instead of returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageIssue {
    /// The medium could not be read or written.
    #[error("storage unavailable for {key}: {message}")]
    Unavailable { key: String, message: String },

    /// The slot holds something that does not decode.
    #[error("storage corrupt for {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// A value together with any storage issues met while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub issues: Vec<StorageIssue>,
}

impl<T> Outcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            issues: Vec::new(),
        }
    }

    pub fn degraded(value: T, issue: StorageIssue) -> Self {
        Self {
            value,
            issues: vec![issue],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            issues: self.issues,
        }
    }

    /// Takes over the issues of `other`, discarding its value.
    pub fn absorb<U>(mut self, other: Outcome<U>) -> Self {
        self.issues.extend(other.issues);
        self
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Reads and writes the two diary slots on a [`KeyValueStore`].
#[derive(Debug)]
pub struct PersistenceGateway<K> {
    medium: K,
    pretty: bool,
}

impl<K: KeyValueStore> PersistenceGateway<K> {
    pub fn new(medium: K) -> Self {
        Self {
            medium,
            pretty: false,
        }
    }

    /// Pretty-print slot contents. Handy when the data directory is read by
    /// humans.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn medium(&self) -> &K {
        &self.medium
    }

    pub fn save_entries(&mut self, entries: &[VibeEntry]) -> Outcome<()> {
        let outcome = self.save_slot(VIBES_KEY, entries);
        if outcome.is_clean() {
            info!("Saved {} vibe(s)", entries.len());
        }
        outcome
    }

    pub fn load_entries(&self) -> Outcome<Vec<VibeEntry>> {
        let outcome = self.load_slot::<Vec<VibeEntry>>(VIBES_KEY).map(Option::unwrap_or_default);
        info!("Loaded {} vibe(s)", outcome.value.len());
        outcome
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Outcome<()> {
        self.save_slot(SETTINGS_KEY, settings)
    }

    pub fn load_settings(&self) -> Outcome<Settings> {
        let outcome = self.load_slot::<Settings>(SETTINGS_KEY).map(Option::unwrap_or_default);
        debug!("Settings loaded: {:?}", outcome.value);
        outcome
    }

    /// Removes both slots. Returns `true` when both are gone.
    ///
    /// If the second removal fails after the first succeeded, the vibes slot
    /// is written back from `entries` so the medium is left as it was.
    pub fn clear(&mut self, entries: &[VibeEntry]) -> Outcome<bool> {
        if let Err(e) = self.medium.remove(VIBES_KEY) {
            return self.refused(VIBES_KEY, e);
        }

        if let Err(e) = self.medium.remove(SETTINGS_KEY) {
            warn!("Restoring {} after failed clear", VIBES_KEY);
            let restore = self.save_entries(entries);
            return self.refused(SETTINGS_KEY, e).absorb(restore);
        }

        info!("Cleared all persisted slots");
        Outcome::clean(true)
    }

    fn refused(&self, key: &str, e: VibeError) -> Outcome<bool> {
        warn!("Storage refused to clear {}: {}", key, e);
        Outcome::degraded(
            false,
            StorageIssue::Unavailable {
                key: key.to_string(),
                message: e.to_string(),
            },
        )
    }

    fn save_slot<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Outcome<()> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };

        let encoded = match encoded {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {}: {}", key, e);
                return Outcome::degraded(
                    (),
                    StorageIssue::Corrupt {
                        key: key.to_string(),
                        message: e.to_string(),
                    },
                );
            }
        };

        match self.medium.set(key, &encoded) {
            Ok(()) => {
                debug!("Data saved to storage: {}", key);
                Outcome::clean(())
            }
            Err(e) => {
                warn!("Error saving {} to storage: {}", key, e);
                Outcome::degraded(
                    (),
                    StorageIssue::Unavailable {
                        key: key.to_string(),
                        message: e.to_string(),
                    },
                )
            }
        }
    }

    fn load_slot<T: DeserializeOwned>(&self, key: &str) -> Outcome<Option<T>> {
        let raw = match self.medium.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Slot {} is empty", key);
                return Outcome::clean(None);
            }
            Err(e) => {
                warn!("Error loading {} from storage: {}", key, e);
                return Outcome::degraded(
                    None,
                    StorageIssue::Unavailable {
                        key: key.to_string(),
                        message: e.to_string(),
                    },
                );
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Outcome::clean(Some(value)),
            Err(e) => {
                warn!("Slot {} holds undecodable data: {}", key, e);
                Outcome::degraded(
                    None,
                    StorageIssue::Corrupt {
                        key: key.to_string(),
                        message: e.to_string(),
                    },
                )
            }
        }
    }
}
