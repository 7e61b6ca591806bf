//! Derived views over a list of vibes: period windows, streaks, mood counts.
//!
//! Every function here is pure. Calendar questions ("which day is this
//! entry on?") are answered in the time zone of the `now` passed in, so the
//! diary hands in local time and the tests hand in UTC.
use std::collections::BTreeMap;

use chrono::{DateTime, Months, NaiveDate, TimeDelta, TimeZone, Utc};
use log::trace;
use serde::Serialize;

use crate::{MoodKind, Period, VibeEntry};

/// Length of the timeline strip, in days.
pub const TIMELINE_DAYS: u32 = 7;

/// Start of the window for `period`, or `None` when nothing is filtered.
///
/// The month window subtracts one calendar month and clamps the day to the
/// end of the shorter month: March 31 gives the last day of February.
pub fn window_start<Tz: TimeZone>(period: Period, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    let now_utc = now.with_timezone(&Utc);
    match period {
        Period::Week => Some(now_utc - TimeDelta::days(7)),
        Period::Month => {
            let start = now
                .clone()
                .checked_sub_months(Months::new(1))
                .map(|start| start.with_timezone(&Utc))
                // Local wall time fell into a DST gap; do the arithmetic in UTC.
                .or_else(|| now_utc.checked_sub_months(Months::new(1)));
            Some(start.unwrap_or(DateTime::<Utc>::MIN_UTC))
        }
        Period::All => None,
    }
}

/// Entries inside the window for `period`, order preserved.
pub fn filter_for_period<Tz: TimeZone>(
    entries: &[VibeEntry],
    period: Period,
    now: &DateTime<Tz>,
) -> Vec<VibeEntry> {
    match window_start(period, now) {
        Some(start) => entries
            .iter()
            .filter(|entry| entry.timestamp >= start)
            .cloned()
            .collect(),
        None => entries.to_vec(),
    }
}

/// Consecutive days, ending today, with at least one entry.
///
/// The walk stops at the first entry off the expected day, so an entry dated
/// after today ends the run as well.
pub fn current_streak<Tz: TimeZone>(entries: &[VibeEntry], now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut sorted: Vec<&VibeEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut streak = 0;
    let mut expected = today;
    let mut last_counted: Option<NaiveDate> = None;

    for entry in sorted {
        let day = entry.timestamp.with_timezone(&tz).date_naive();
        if Some(day) == last_counted {
            continue;
        }
        if day != expected {
            break;
        }
        streak += 1;
        last_counted = Some(day);
        match expected.pred_opt() {
            Some(previous) => expected = previous,
            None => break,
        }
    }

    trace!("Streak of {} day(s) ending {}", streak, today);
    streak
}

/// Number of entries per mood. Only moods that occur are present, and keys
/// iterate in mood declaration order.
pub fn mood_frequency(entries: &[VibeEntry]) -> BTreeMap<MoodKind, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_insert(0) += 1;
    }
    counts
}

/// Most frequent mood; ties go to the mood declared first.
pub fn top_mood(entries: &[VibeEntry]) -> Option<MoodKind> {
    mood_frequency(entries)
        .into_iter()
        .fold(None, |best: Option<(MoodKind, usize)>, (mood, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((mood, count)),
        })
        .map(|(mood, _)| mood)
}

/// One bar of the mood chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub mood: MoodKind,
    pub count: usize,
    /// Share of the largest bar, 0 to 100.
    pub percent: f64,
}

/// A bar for every mood in declaration order, scaled against the largest
/// count (treated as at least 1 so an empty chart is all zeros).
pub fn mood_chart(entries: &[VibeEntry]) -> Vec<ChartBar> {
    let counts = mood_frequency(entries);
    let max = counts.values().copied().max().unwrap_or(0).max(1);

    MoodKind::ALL
        .into_iter()
        .map(|mood| {
            let count = counts.get(&mood).copied().unwrap_or(0);
            ChartBar {
                mood,
                count,
                percent: count as f64 / max as f64 * 100.0,
            }
        })
        .collect()
}

/// A day of the timeline strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineDay {
    pub date: NaiveDate,
    /// Mood of the newest entry recorded that day.
    pub mood: Option<MoodKind>,
}

/// The last seven days ending today, oldest first. `entries` must be newest
/// first, as the store keeps them.
pub fn weekly_timeline<Tz: TimeZone>(entries: &[VibeEntry], now: &DateTime<Tz>) -> Vec<TimelineDay> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..TIMELINE_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset.into())))
        .map(|date| TimelineDay {
            date,
            mood: entries
                .iter()
                .find(|entry| entry.timestamp.with_timezone(&tz).date_naive() == date)
                .map(|entry| entry.mood),
        })
        .collect()
}

/// Everything the statistics view shows for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub period: Period,
    /// Entries inside the period.
    pub total: usize,
    /// Streak over all entries, independent of the period.
    pub streak: u32,
    pub top_mood: Option<MoodKind>,
    pub chart: Vec<ChartBar>,
}

pub fn summarize<Tz: TimeZone>(entries: &[VibeEntry], period: Period, now: &DateTime<Tz>) -> StatsSummary {
    let in_period = filter_for_period(entries, period, now);
    StatsSummary {
        period,
        total: in_period.len(),
        streak: current_streak(entries, now),
        top_mood: top_mood(&in_period),
        chart: mood_chart(&in_period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn entry(id: i64, timestamp: DateTime<Utc>, mood: MoodKind) -> VibeEntry {
        VibeEntry::new(id, timestamp, mood, "")
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let now = at(2024, 6, 15, 18);
        let entries = vec![
            entry(3, now - TimeDelta::hours(2), MoodKind::Good),
            entry(2, now - TimeDelta::days(1), MoodKind::Sad),
            entry(1, now - TimeDelta::days(3), MoodKind::Okay),
        ];
        assert_eq!(current_streak(&entries, &now), 2);
    }

    #[test]
    fn streak_is_zero_without_entries_or_without_today() {
        let now = at(2024, 6, 15, 18);
        assert_eq!(current_streak(&[], &now), 0);

        let stale = vec![entry(1, now - TimeDelta::days(1), MoodKind::Good)];
        assert_eq!(current_streak(&stale, &now), 0);
    }

    #[test]
    fn streak_counts_a_busy_day_once() {
        let now = at(2024, 6, 15, 18);
        let entries = vec![
            entry(5, at(2024, 6, 15, 17), MoodKind::Good),
            entry(4, at(2024, 6, 15, 9), MoodKind::Good),
            entry(3, at(2024, 6, 14, 20), MoodKind::Sad),
            entry(2, at(2024, 6, 14, 8), MoodKind::Sad),
            entry(1, at(2024, 6, 13, 8), MoodKind::Tired),
        ];
        assert_eq!(current_streak(&entries, &now), 3);
    }

    #[test]
    fn streak_ignores_insertion_order() {
        let now = at(2024, 6, 15, 18);
        let entries = vec![
            entry(1, at(2024, 6, 14, 8), MoodKind::Sad),
            entry(2, at(2024, 6, 15, 8), MoodKind::Good),
        ];
        assert_eq!(current_streak(&entries, &now), 2);
    }

    #[test]
    fn future_dated_newest_entry_ends_the_streak() {
        let now = at(2024, 6, 15, 18);
        let entries = vec![
            entry(2, at(2024, 6, 17, 18), MoodKind::Good),
            entry(1, at(2024, 6, 15, 17), MoodKind::Good),
        ];
        assert_eq!(current_streak(&entries, &now), 0);
    }

    #[test]
    fn week_window_excludes_eight_day_old_entries() {
        let now = at(2024, 6, 15, 12);
        let old = entry(1, now - TimeDelta::days(8), MoodKind::Sad);
        let boundary = entry(2, now - TimeDelta::days(7), MoodKind::Okay);
        let recent = entry(3, now - TimeDelta::days(1), MoodKind::Good);
        let entries = vec![recent.clone(), boundary.clone(), old.clone()];

        assert_eq!(
            filter_for_period(&entries, Period::Week, &now),
            vec![recent, boundary]
        );
        assert_eq!(filter_for_period(&entries, Period::All, &now).len(), 3);
    }

    #[test]
    fn month_window_clamps_day_of_month() {
        let now = at(2023, 3, 31, 10);
        assert_eq!(window_start(Period::Month, &now), Some(at(2023, 2, 28, 10)));

        let leap = at(2024, 3, 31, 10);
        assert_eq!(window_start(Period::Month, &leap), Some(at(2024, 2, 29, 10)));

        let plain = at(2024, 6, 15, 10);
        assert_eq!(window_start(Period::Month, &plain), Some(at(2024, 5, 15, 10)));
        assert_eq!(window_start(Period::All, &plain), None);
    }

    #[test]
    fn frequency_and_top_mood() {
        let now = at(2024, 6, 15, 12);
        let entries = vec![
            entry(3, now, MoodKind::Good),
            entry(2, now, MoodKind::Good),
            entry(1, now, MoodKind::Sad),
        ];
        let counts = mood_frequency(&entries);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&MoodKind::Good], 2);
        assert_eq!(counts[&MoodKind::Sad], 1);
        assert_eq!(top_mood(&entries), Some(MoodKind::Good));
        assert_eq!(top_mood(&[]), None);
    }

    #[test]
    fn top_mood_ties_go_to_declaration_order() {
        let now = at(2024, 6, 15, 12);
        let entries = vec![
            entry(4, now, MoodKind::OnFire),
            entry(3, now, MoodKind::Sad),
            entry(2, now, MoodKind::OnFire),
            entry(1, now, MoodKind::Sad),
        ];
        assert_eq!(top_mood(&entries), Some(MoodKind::Sad));
    }

    #[test]
    fn chart_scales_against_largest_bar() {
        let now = at(2024, 6, 15, 12);
        let entries = vec![
            entry(3, now, MoodKind::Tired),
            entry(2, now, MoodKind::Tired),
            entry(1, now, MoodKind::Excellent),
        ];
        let chart = mood_chart(&entries);
        assert_eq!(chart.len(), MoodKind::ALL.len());
        assert_eq!(chart[0].mood, MoodKind::Excellent);
        assert_eq!(chart[0].percent, 50.0);
        assert_eq!(chart[4].count, 2);
        assert_eq!(chart[4].percent, 100.0);
        assert!(mood_chart(&[]).iter().all(|bar| bar.percent == 0.0));
    }

    #[test]
    fn timeline_shows_newest_mood_per_day() {
        let now = at(2024, 6, 15, 12);
        let entries = vec![
            entry(3, at(2024, 6, 15, 11), MoodKind::OnFire),
            entry(2, at(2024, 6, 15, 8), MoodKind::Sad),
            entry(1, at(2024, 6, 10, 8), MoodKind::Okay),
        ];
        let days = weekly_timeline(&entries, &now);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(days[0].mood, None);
        assert_eq!(days[1].mood, Some(MoodKind::Okay));
        assert_eq!(days[6].mood, Some(MoodKind::OnFire));
    }

    #[test]
    fn summary_uses_period_for_counts_but_not_for_streak() {
        let now = at(2024, 6, 15, 12);
        let entries = vec![
            entry(2, now, MoodKind::Good),
            entry(1, now - TimeDelta::days(20), MoodKind::Sad),
        ];
        let summary = summarize(&entries, Period::Week, &now);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.streak, 1);
        assert_eq!(summary.top_mood, Some(MoodKind::Good));
    }
}
