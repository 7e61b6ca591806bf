//! The fixed set of moods a vibe can carry.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::VibeError;

/// One of the eight moods. Declaration order matters: it is the order used
/// by charts and the tie-break order for the top mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "MoodRecord", try_from = "MoodRecord")]
pub enum MoodKind {
    Excellent,
    Good,
    Okay,
    Sad,
    Tired,
    Annoyed,
    Anxious,
    OnFire,
}

impl MoodKind {
    /// Every mood, in declaration order.
    pub const ALL: [MoodKind; 8] = [
        MoodKind::Excellent,
        MoodKind::Good,
        MoodKind::Okay,
        MoodKind::Sad,
        MoodKind::Tired,
        MoodKind::Annoyed,
        MoodKind::Anxious,
        MoodKind::OnFire,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            MoodKind::Excellent => "😄",
            MoodKind::Good => "😊",
            MoodKind::Okay => "😐",
            MoodKind::Sad => "😔",
            MoodKind::Tired => "😫",
            MoodKind::Annoyed => "😤",
            MoodKind::Anxious => "😰",
            MoodKind::OnFire => "🔥",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodKind::Excellent => "Slay",
            MoodKind::Good => "+ Vibe",
            MoodKind::Okay => "Mid",
            MoodKind::Sad => "Sad boi hours",
            MoodKind::Tired => "Burnt out",
            MoodKind::Annoyed => "Big mad",
            MoodKind::Anxious => "Anxiety era",
            MoodKind::OnFire => "Main character energy",
        }
    }

    /// Stable identifier used in persisted documents.
    pub fn value(self) -> &'static str {
        match self {
            MoodKind::Excellent => "excellent",
            MoodKind::Good => "good",
            MoodKind::Okay => "okay",
            MoodKind::Sad => "sad",
            MoodKind::Tired => "tired",
            MoodKind::Annoyed => "annoyed",
            MoodKind::Anxious => "anxious",
            MoodKind::OnFire => "onfire",
        }
    }
}

impl fmt::Display for MoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for MoodKind {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        MoodKind::ALL
            .into_iter()
            .find(|mood| mood.value() == needle)
            .ok_or_else(|| VibeError::UnknownMood {
                value: s.to_string(),
            })
    }
}

/// Persisted shape of a mood: `{ "emoji", "label", "value" }`.
///
/// Only `value` is read back; glyph and label always come from the table so
/// an edited document cannot rename a mood.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoodRecord {
    #[serde(default)]
    emoji: String,
    #[serde(default)]
    label: String,
    value: String,
}

impl From<MoodKind> for MoodRecord {
    fn from(mood: MoodKind) -> Self {
        MoodRecord {
            emoji: mood.emoji().to_string(),
            label: mood.label().to_string(),
            value: mood.value().to_string(),
        }
    }
}

impl TryFrom<MoodRecord> for MoodKind {
    type Error = VibeError;

    fn try_from(record: MoodRecord) -> Result<Self, Self::Error> {
        record.value.parse()
    }
}
