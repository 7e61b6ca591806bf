//! Core data structures for the vibe diary.
//!
//! This module contains the journal record and the user settings that are
//! persisted next to it.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MoodKind, VibeError};

/// Represents a single journal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeEntry {
    /// Unique identifier, a creation time in milliseconds
    pub id: i64,
    /// When the vibe was recorded
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    /// The recorded mood
    pub mood: MoodKind,
    /// Free-form note, possibly empty
    #[serde(default)]
    pub notes: String,
}

impl VibeEntry {
    /// Creates a new entry. Notes are trimmed the way the input form trims them.
    pub fn new(id: i64, timestamp: DateTime<Utc>, mood: MoodKind, notes: &str) -> Self {
        VibeEntry {
            id,
            timestamp,
            mood,
            notes: notes.trim().to_string(),
        }
    }
}

/// Statistics window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
    All,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "all" => Ok(Period::All),
            _ => Err(VibeError::InvalidPeriod {
                value: s.to_string(),
            }),
        }
    }
}

pub const DEFAULT_VIEW: &str = "home";

/// Persisted UI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_view", deserialize_with = "lenient::view")]
    pub current_view: String,
    #[serde(default, deserialize_with = "lenient::period")]
    pub current_period: Period,
}

fn default_view() -> String {
    DEFAULT_VIEW.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            current_view: default_view(),
            current_period: Period::default(),
        }
    }
}

/// Timestamps are written like `2024-05-01T08:30:00.000Z` and read back from
/// any RFC 3339 string.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Settings fields fall back to their defaults instead of failing: an empty
/// view or an unknown period in a stored document means "use the default".
mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::{default_view, Period};

    pub fn view<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            _ => default_view(),
        })
    }

    pub fn period<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Period, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}
