use crate::models::LogEntry;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Insertion-ordered log of consumption events.
///
/// Entries are kept in the order they were appended. Nothing re-sorts them, so
/// a clock that jumps backwards leaves them out of timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Builds a log from persisted entries, dropping zero-count entries and
    /// repeated ids.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.count == 0 {
                warn!(id = %entry.id, "dropping log entry with zero count");
                continue;
            }
            if !seen.insert(entry.id.clone()) {
                warn!(id = %entry.id, "dropping log entry with duplicate id");
                continue;
            }
            kept.push(entry);
        }
        Self { entries: kept }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.count)).sum()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Returns whether an entry was removed.
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn delete_most_recent_for_day<Tz: TimeZone>(
        &mut self,
        day: NaiveDate,
        tz: &Tz,
    ) -> Option<LogEntry> {
        let index = self
            .entries
            .iter()
            .rposition(|entry| day_key(entry.timestamp, tz) == Some(day))?;
        Some(self.entries.remove(index))
    }

    /// Entries whose local date is `day`, in insertion order.
    pub fn on_day<'a, Tz: TimeZone>(
        &'a self,
        day: NaiveDate,
        tz: &'a Tz,
    ) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| day_key(entry.timestamp, tz) == Some(day))
    }
}

/// Local calendar date of a millisecond timestamp in `tz`.
pub fn day_key<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(tz).date_naive())
}

pub fn today_key<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.date_naive()
}

/// Today and the six days before it, oldest first.
pub fn trailing_days(today: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|index| today - Duration::days(6 - index as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetailDraft;
    use chrono::FixedOffset;

    fn entry(id: &str, timestamp: i64) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            ..LogEntry::new(timestamp, DetailDraft::default())
        }
    }

    fn ms(year: i32, month: u32, day: u32, hour: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn delete_by_id_keeps_relative_order() {
        let mut log = EventLog::default();
        for id in ["a", "b", "c", "d"] {
            log.append(entry(id, 0));
        }

        assert!(log.delete_by_id("b"));
        assert!(log.get("b").is_none());
        let ids: Vec<_> = log.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "d"]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut log = EventLog::default();
        log.append(entry("a", 0));
        assert!(!log.delete_by_id("zzz"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn delete_most_recent_for_day_scans_from_end() {
        let mut log = EventLog::default();
        log.append(entry("old", ms(2026, 1, 4, 9)));
        log.append(entry("first", ms(2026, 1, 5, 8)));
        log.append(entry("second", ms(2026, 1, 5, 12)));
        log.append(entry("other-day", ms(2026, 1, 6, 9)));

        let removed = log.delete_most_recent_for_day(date(2026, 1, 5), &Utc);
        assert_eq!(removed.map(|e| e.id), Some("second".to_string()));
        let ids: Vec<_> = log.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["old", "first", "other-day"]);
    }

    #[test]
    fn delete_most_recent_for_day_without_match_is_noop() {
        let mut log = EventLog::default();
        log.append(entry("a", ms(2026, 1, 4, 9)));
        assert!(log.delete_most_recent_for_day(date(2026, 1, 5), &Utc).is_none());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn day_key_uses_the_given_zone() {
        let late_utc = ms(2026, 1, 5, 22);
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(day_key(late_utc, &Utc), Some(date(2026, 1, 5)));
        assert_eq!(day_key(late_utc, &ist), Some(date(2026, 1, 6)));
    }

    #[test]
    fn day_key_rejects_out_of_range_timestamps() {
        assert_eq!(day_key(i64::MAX, &Utc), None);
    }

    #[test]
    fn trailing_days_are_oldest_first() {
        let days = trailing_days(date(2026, 3, 2));
        assert_eq!(days[0], date(2026, 2, 24));
        assert_eq!(days[6], date(2026, 3, 2));
    }

    #[test]
    fn from_entries_drops_invalid_records() {
        let mut zero = entry("zero", 0);
        zero.count = 0;
        let log = EventLog::from_entries(vec![entry("a", 0), zero, entry("a", 5), entry("b", 1)]);
        let ids: Vec<_> = log.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(log.entries()[0].timestamp, 0);
    }

    #[test]
    fn total_count_sums_batches() {
        let mut log = EventLog::default();
        let mut batch = entry("batch", 0);
        batch.count = 3;
        log.append(batch);
        log.append(entry("single", 0));
        assert_eq!(log.total_count(), 4);
    }
}
