//! The diary: one owned state object tying the store, the settings and the
//! persistence gateway together.
//!
//! Every mutation runs to completion and flushes the affected slot before
//! returning. Callers get storage trouble back as [`Outcome`] issues; only
//! [`VibeError::NoMoodSelected`] and [`VibeError::InvalidFormat`] are real
//! errors here.
use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::{
    backup_file_name, current_streak, export_snapshot, mood_frequency, parse_snapshot, summarize,
    top_mood, weekly_timeline, Clock, KeyValueStore, MoodKind, Outcome, Period,
    PersistenceGateway, Result, Settings, StatsSummary, SystemClock, TimelineDay, VibeEntry,
    VibeStore,
};

pub struct VibeDiary<K, C = SystemClock> {
    store: VibeStore,
    settings: Settings,
    gateway: PersistenceGateway<K>,
    clock: C,
}

impl<K: KeyValueStore, C: Clock> VibeDiary<K, C> {
    /// Hydrates a diary from `gateway`. Unreadable slots start empty.
    pub fn open(gateway: PersistenceGateway<K>, clock: C) -> Outcome<Self> {
        let entries = gateway.load_entries();
        let settings = gateway.load_settings();

        info!(
            "Diary opened with {} vibe(s), view={}, period={}",
            entries.value.len(),
            settings.value.current_view,
            settings.value.current_period
        );

        let issues = entries.issues.into_iter().chain(settings.issues).collect();
        Outcome {
            value: Self {
                store: VibeStore::from_entries(entries.value),
                settings: settings.value,
                gateway,
                clock,
            },
            issues,
        }
    }

    fn local_now(&self) -> DateTime<Local> {
        self.clock.now().with_timezone(&Local)
    }

    pub fn record_vibe(&mut self, mood: Option<MoodKind>, notes: &str) -> Result<Outcome<VibeEntry>> {
        let entry = self.store.record(mood, notes, self.clock.now())?;
        Ok(self.flush_entries().map(|_| entry))
    }

    /// Deletes by id; unknown ids are a no-op. Returns whether a vibe went away.
    pub fn delete_vibe(&mut self, id: i64) -> Outcome<bool> {
        let removed = self.store.delete(id);
        self.flush_entries().map(|_| removed)
    }

    pub fn get(&self, id: i64) -> Option<&VibeEntry> {
        self.store.get(id)
    }

    /// All vibes, newest first.
    pub fn list_all(&self) -> &[VibeEntry] {
        self.store.entries()
    }

    pub fn list_for_period(&self, period: Period) -> Vec<VibeEntry> {
        self.store.for_period(period, &self.local_now())
    }

    /// Streak over all vibes, ending today in local time.
    pub fn current_streak(&self) -> u32 {
        current_streak(self.store.entries(), &self.local_now())
    }

    pub fn mood_frequency(&self, period: Period) -> BTreeMap<MoodKind, usize> {
        mood_frequency(&self.list_for_period(period))
    }

    pub fn top_mood(&self, period: Period) -> Option<MoodKind> {
        top_mood(&self.list_for_period(period))
    }

    pub fn summary(&self, period: Period) -> StatsSummary {
        summarize(self.store.entries(), period, &self.local_now())
    }

    pub fn weekly_timeline(&self) -> Vec<TimelineDay> {
        weekly_timeline(self.store.entries(), &self.local_now())
    }

    pub fn search(&self, query: &str) -> Vec<VibeEntry> {
        self.store.search(query)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn switch_view(&mut self, view: &str) -> Outcome<()> {
        debug!("Switching view to {}", view);
        self.settings.current_view = view.to_string();
        self.save_settings()
    }

    pub fn set_period(&mut self, period: Period) -> Outcome<()> {
        debug!("Switching period to {}", period);
        self.settings.current_period = period;
        self.save_settings()
    }

    pub fn save_settings(&mut self) -> Outcome<()> {
        self.gateway.save_settings(&self.settings)
    }

    /// Re-reads settings from the medium, replacing the in-memory copy.
    pub fn load_settings(&mut self) -> Outcome<Settings> {
        let loaded = self.gateway.load_settings();
        self.settings = loaded.value.clone();
        loaded
    }

    pub fn export_snapshot(&self) -> Result<String> {
        export_snapshot(self.store.entries(), &self.settings, self.clock.now())
    }

    /// File name the UI should offer for [`export_snapshot`](Self::export_snapshot).
    pub fn backup_file_name(&self) -> String {
        backup_file_name(self.clock.now().date_naive())
    }

    /// Replaces all vibes and settings with the contents of `document`.
    ///
    /// The document is fully parsed before anything changes; on
    /// [`VibeError::InvalidFormat`] the diary is untouched. The returned count
    /// is the number of vibes kept after dropping duplicate ids.
    pub fn import_snapshot(&mut self, document: &str) -> Result<Outcome<usize>> {
        let snapshot = parse_snapshot(document)?;

        self.store.replace(VibeStore::from_entries(snapshot.vibes));
        self.settings = snapshot.settings;

        let count = self.store.len();
        info!("Imported {} vibe(s)", count);

        let entries = self.flush_entries();
        let settings = self.save_settings();
        Ok(entries.absorb(settings).map(|_| count))
    }

    /// Forgets everything, on the medium and in memory.
    ///
    /// When the medium refuses, memory is left as it was and the refusal is
    /// reported.
    pub fn clear_all(&mut self) -> Outcome<()> {
        let cleared = self.gateway.clear(self.store.entries());
        if cleared.value {
            self.store.clear();
            self.settings = Settings::default();
            info!("All data cleared");
        } else {
            warn!("Clear aborted, diary left unchanged");
        }
        cleared.map(|_| ())
    }

    fn flush_entries(&mut self) -> Outcome<()> {
        self.gateway.save_entries(self.store.entries())
    }
}
