//! In-memory vibe collection.
//!
//! The store owns the only copy of the entries. It knows nothing about
//! persistence; [`VibeDiary`](crate::VibeDiary) flushes after each mutation.
use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use log::{debug, info, trace, warn};

use crate::{filter_for_period, MoodKind, Period, Result, VibeEntry, VibeError};

/// Ordered collection of vibes, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VibeStore {
    entries: Vec<VibeEntry>,
}

impl VibeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from previously persisted entries, keeping their order.
    ///
    /// Later duplicates of an id are dropped so that lookups by id stay
    /// unambiguous.
    pub fn from_entries(entries: Vec<VibeEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let total = entries.len();
        let entries: Vec<VibeEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id))
            .collect();

        if entries.len() < total {
            warn!(
                "Dropped {} vibe(s) with duplicate ids while loading",
                total - entries.len()
            );
        }
        Self { entries }
    }

    /// Records a new vibe at the front of the collection.
    ///
    /// Ids are creation milliseconds, bumped past the largest resident id
    /// when two vibes land in the same millisecond.
    pub fn record(&mut self, mood: Option<MoodKind>, notes: &str, now: DateTime<Utc>) -> Result<VibeEntry> {
        let mood = mood.ok_or_else(|| {
            debug!("Refusing to record a vibe without a mood");
            VibeError::NoMoodSelected
        })?;

        // Persisted timestamps carry milliseconds; keep memory identical
        let timestamp = now.trunc_subsecs(3);
        let id = self.next_id(timestamp);
        let entry = VibeEntry::new(id, timestamp, mood, notes);
        self.entries.insert(0, entry.clone());

        info!("Recorded vibe {} ({})", entry.id, entry.mood);
        Ok(entry)
    }

    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        match self.entries.iter().map(|entry| entry.id).max() {
            Some(max) if max >= candidate => match max.checked_add(1) {
                Some(next) => {
                    trace!("Id {} already taken, using {}", candidate, next);
                    next
                }
                None => {
                    let free = self.first_free_id(candidate);
                    warn!("Largest id is {}, falling back to free id {}", max, free);
                    free
                }
            },
            _ => candidate,
        }
    }

    /// First id not in use, searching upwards from `from` and then downwards.
    fn first_free_id(&self, from: i64) -> i64 {
        let taken: HashSet<i64> = self.entries.iter().map(|entry| entry.id).collect();
        (from..=i64::MAX)
            .chain((i64::MIN..from).rev())
            .find(|id| !taken.contains(id))
            .unwrap_or(from)
    }

    /// Removes the vibe with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;

        if removed {
            info!("Deleted vibe {}", id);
        } else {
            debug!("No vibe with id {}, nothing deleted", id);
        }
        removed
    }

    pub fn get(&self, id: i64) -> Option<&VibeEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// All vibes, newest first.
    pub fn entries(&self) -> &[VibeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_period<Tz: TimeZone>(&self, period: Period, now: &DateTime<Tz>) -> Vec<VibeEntry> {
        filter_for_period(&self.entries, period, now)
    }

    /// Swaps the whole collection, returning the previous one.
    pub fn replace(&mut self, other: VibeStore) -> VibeStore {
        std::mem::replace(self, other)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Searches notes and mood labels using fuzzy matching.
    /// Returns matching vibes sorted by relevance score
    pub fn search(&self, query: &str) -> Vec<VibeEntry> {
        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<(i64, &VibeEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                // Notes matter more than the mood label
                let notes_score = matcher.fuzzy_match(&entry.notes, query).unwrap_or(0);
                let mood_score = matcher.fuzzy_match(entry.mood.label(), query).unwrap_or(0);
                let score = notes_score * 2 + mood_score;
                (score > 0).then_some((score, entry))
            })
            .collect();

        // Stable, so equal scores stay newest first
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        debug!("Search '{}' matched {} vibe(s)", query, scored.len());
        scored.into_iter().map(|(_, entry)| entry.clone()).collect()
    }
}
