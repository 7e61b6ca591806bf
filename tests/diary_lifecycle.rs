use std::fs;

use chrono::{TimeDelta, TimeZone, Utc};
use tempfile::TempDir;
use vibe_diary::{
    Clock, FileStore, FixedClock, KeyValueStore, MemoryStore, MoodKind, Period, PersistenceGateway,
    Result, Settings, StorageIssue, VibeDiary, VibeError, SETTINGS_KEY, VIBES_KEY,
};

fn start() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
}

fn open_file_diary<'a>(dir: &TempDir, clock: &'a FixedClock) -> VibeDiary<FileStore, &'a FixedClock> {
    let opened = VibeDiary::open(PersistenceGateway::new(FileStore::new(dir.path())), clock);
    assert!(opened.is_clean(), "unexpected issues: {:?}", opened.issues);
    opened.into_value()
}

#[test]
fn entries_survive_a_restart_in_reverse_chronological_order() {
    let dir = tempfile::tempdir().unwrap();
    let clock = start();

    let mut ids = Vec::new();
    {
        let mut diary = open_file_diary(&dir, &clock);
        for (mood, notes) in [
            (MoodKind::Good, "morning run"),
            (MoodKind::Tired, ""),
            (MoodKind::OnFire, "promotion!"),
        ] {
            let outcome = diary.record_vibe(Some(mood), notes).unwrap();
            assert!(outcome.is_clean());
            ids.push(outcome.value.id);
            clock.advance(TimeDelta::milliseconds(1_234));
        }
    }

    let diary = open_file_diary(&dir, &clock);
    let listed: Vec<i64> = diary.list_all().iter().map(|entry| entry.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);
    assert_eq!(diary.list_all()[0].notes, "promotion!");
    assert_eq!(
        diary.list_all()[2].timestamp,
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    );
}

#[test]
fn deleting_removes_only_the_matching_id() {
    let dir = tempfile::tempdir().unwrap();
    let clock = start();
    let mut diary = open_file_diary(&dir, &clock);

    let first = diary.record_vibe(Some(MoodKind::Sad), "").unwrap().value;
    clock.advance(TimeDelta::minutes(1));
    let second = diary.record_vibe(Some(MoodKind::Okay), "").unwrap().value;

    let missing = diary.delete_vibe(424242);
    assert!(!missing.value);
    assert_eq!(diary.list_all().len(), 2);

    assert!(diary.delete_vibe(first.id).value);
    assert_eq!(diary.list_all(), &[second.clone()]);

    let reopened = open_file_diary(&dir, &clock);
    assert_eq!(reopened.list_all(), &[second]);
}

#[test]
fn export_and_import_into_a_cleared_diary() {
    let dir = tempfile::tempdir().unwrap();
    let clock = start();
    let mut diary = open_file_diary(&dir, &clock);

    diary.record_vibe(Some(MoodKind::Excellent), "hiked").unwrap();
    clock.advance(TimeDelta::hours(3));
    diary.record_vibe(Some(MoodKind::Annoyed), "traffic").unwrap();
    diary.switch_view("statistics");
    diary.set_period(Period::Month);

    let entries = diary.list_all().to_vec();
    let settings = diary.settings().clone();
    let document = diary.export_snapshot().unwrap();

    assert!(diary.clear_all().is_clean());
    assert!(diary.list_all().is_empty());
    assert_eq!(diary.settings(), &Settings::default());
    assert!(!dir.path().join(format!("{}.json", VIBES_KEY)).exists());

    let imported = diary.import_snapshot(&document).unwrap();
    assert_eq!(imported.value, 2);
    assert_eq!(diary.list_all(), &entries[..]);
    assert_eq!(diary.settings(), &settings);

    let reopened = open_file_diary(&dir, &clock);
    assert_eq!(reopened.list_all(), &entries[..]);
    assert_eq!(reopened.settings(), &settings);
}

#[test]
fn importing_an_empty_object_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let clock = start();
    let mut diary = open_file_diary(&dir, &clock);
    diary.record_vibe(Some(MoodKind::Good), "keep me").unwrap();
    let before = diary.list_all().to_vec();

    let err = diary.import_snapshot("{}").unwrap_err();
    assert!(matches!(err, VibeError::InvalidFormat { .. }));
    assert_eq!(diary.list_all(), &before[..]);

    let reopened = open_file_diary(&dir, &clock);
    assert_eq!(reopened.list_all(), &before[..]);
}

#[test]
fn streak_with_a_gap_counts_back_to_the_gap() {
    let clock = start();
    let mut diary =
        VibeDiary::open(PersistenceGateway::new(MemoryStore::new()), &clock).into_value();
    assert_eq!(diary.current_streak(), 0);

    let today = clock.now();
    for days_ago in [3, 1, 0] {
        clock.set(today - TimeDelta::days(days_ago));
        diary.record_vibe(Some(MoodKind::Okay), "").unwrap();
    }
    clock.set(today);

    assert_eq!(diary.current_streak(), 2);
}

#[test]
fn week_filter_drops_old_entries() {
    let clock = start();
    let mut diary =
        VibeDiary::open(PersistenceGateway::new(MemoryStore::new()), &clock).into_value();

    let now = clock.now();
    clock.set(now - TimeDelta::days(8));
    diary.record_vibe(Some(MoodKind::Sad), "old").unwrap();
    clock.set(now);
    diary.record_vibe(Some(MoodKind::Good), "new").unwrap();

    let week = diary.list_for_period(Period::Week);
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].notes, "new");
    assert_eq!(diary.list_for_period(Period::All).len(), 2);
}

#[test]
fn frequency_and_top_mood_over_the_store() {
    let clock = start();
    let mut diary =
        VibeDiary::open(PersistenceGateway::new(MemoryStore::new()), &clock).into_value();
    for mood in [MoodKind::Good, MoodKind::Good, MoodKind::Sad] {
        diary.record_vibe(Some(mood), "").unwrap();
    }

    let counts = diary.mood_frequency(Period::All);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&MoodKind::Good], 2);
    assert_eq!(counts[&MoodKind::Sad], 1);
    assert_eq!(diary.top_mood(Period::All), Some(MoodKind::Good));
}

#[test]
fn corrupt_slot_starts_empty_and_reports_it() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("{}.json", VIBES_KEY)), "[{\"id\": oops").unwrap();
    let clock = start();

    let opened = VibeDiary::open(PersistenceGateway::new(FileStore::new(dir.path())), &clock);
    assert!(matches!(opened.issues[..], [StorageIssue::Corrupt { .. }]));

    let mut diary = opened.into_value();
    assert!(diary.list_all().is_empty());

    // The diary stays usable and the next write repairs the slot
    assert!(diary.record_vibe(Some(MoodKind::Good), "").unwrap().is_clean());
    assert_eq!(open_file_diary(&dir, &clock).list_all().len(), 1);
}

/// Medium that accepts writes but refuses to delete one slot.
#[derive(Default)]
struct StickySlot {
    inner: MemoryStore,
    sticky: &'static str,
}

impl KeyValueStore for StickySlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if key == self.sticky {
            return Err(VibeError::ApplicationError {
                message: "storage locked".to_string(),
            });
        }
        self.inner.remove(key)
    }
}

#[test]
fn clear_is_all_or_nothing() {
    for sticky in [VIBES_KEY, SETTINGS_KEY] {
        let clock = start();
        let medium = StickySlot {
            sticky,
            ..StickySlot::default()
        };
        let mut diary = VibeDiary::open(PersistenceGateway::new(medium), &clock).into_value();
        diary.record_vibe(Some(MoodKind::Anxious), "deadline").unwrap();
        diary.set_period(Period::All);

        let outcome = diary.clear_all();
        assert!(
            matches!(outcome.issues[..], [StorageIssue::Unavailable { .. }]),
            "sticky {}: {:?}",
            sticky,
            outcome.issues
        );
        assert_eq!(diary.list_all().len(), 1);
        assert_eq!(diary.settings().current_period, Period::All);

        diary.load_settings();
        assert_eq!(diary.settings().current_period, Period::All);
    }
}

#[test]
fn backup_name_follows_the_clock() {
    let clock = start();
    let diary = VibeDiary::open(PersistenceGateway::new(MemoryStore::new()), &clock).into_value();
    assert_eq!(diary.backup_file_name(), "vibe-diary-backup-2024-06-15.json");
}

#[test]
fn recording_after_importing_the_largest_id_still_works() {
    let clock = start();
    let mut diary =
        VibeDiary::open(PersistenceGateway::new(MemoryStore::new()), &clock).into_value();
    let document = r#"{"vibes": [
        {"id": 9223372036854775807, "timestamp": "2024-06-14T09:30:00.000Z",
         "mood": {"emoji": "🔥", "label": "On fire", "value": "onfire"}, "notes": ""}
    ]}"#;
    assert_eq!(diary.import_snapshot(document).unwrap().value, 1);

    let fresh = diary.record_vibe(Some(MoodKind::Good), "x").unwrap().value;
    assert_eq!(fresh.id, clock.now().timestamp_millis());
    assert_eq!(diary.list_all().len(), 2);
    assert_eq!(diary.list_all()[1].id, i64::MAX);
}
