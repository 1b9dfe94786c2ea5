use chrono::Duration;
use tracing::warn;

use super::cookie::{format_assignment, lookup};
use super::{Clock, RecordStore, SystemClock};

/// Lifetime of every record the player writes.
pub const RECORD_TTL_DAYS: i64 = 30;

pub const SEEN_VIDEOS: &str = "seenVideos";
pub const LAST_PLAYED_VIDEO: &str = "lastPlayedVideo";
pub const CURRENT_PLAY_TIME: &str = "currentPlayTime";

/// Name of the per-item resume point record.
pub fn item_play_time_key(id: &str) -> String {
    format!("{}_{}", CURRENT_PLAY_TIME, id)
}

/// Set/get-by-name adapter over a [`RecordStore`].
///
/// Store failures are logged and swallowed: a write that cannot be stored is
/// simply lost and a read that cannot be served is reported as absent.
pub struct Records<S> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: RecordStore> Records<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn set_record(&mut self, name: &str, value: &str, ttl_days: i64) {
        let expires = self.clock.now() + Duration::days(ttl_days);
        let assignment = format_assignment(name, value, expires);
        if let Err(e) = self.store.assign(&assignment) {
            warn!(record = name, error = %e, "failed to write record");
        }
    }

    pub fn get_record(&mut self, name: &str) -> Option<String> {
        match self.store.cookie_string(self.clock.now()) {
            Ok(jar) => lookup(&jar, name),
            Err(e) => {
                warn!(record = name, error = %e, "failed to read records");
                None
            }
        }
    }

    /// Read a record as seconds. Missing or non-numeric values are `None`.
    pub fn get_seconds(&mut self, name: &str) -> Option<f64> {
        self.get_record(name)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::store::MemoryJar;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<DateTime<Utc>>>);

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    fn records_at(start: DateTime<Utc>) -> (Records<MemoryJar>, ManualClock) {
        let clock = ManualClock(Rc::new(Cell::new(start)));
        (Records::with_clock(MemoryJar::new(), clock.clone()), clock)
    }

    #[test]
    fn set_then_get_within_ttl() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let (mut records, clock) = records_at(start);

        records.set_record("k", "v", 30);
        assert_eq!(records.get_record("k").as_deref(), Some("v"));

        clock.0.set(start + Duration::days(29));
        assert_eq!(records.get_record("k").as_deref(), Some("v"));
    }

    #[test]
    fn absent_after_expiry_or_when_never_set() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let (mut records, clock) = records_at(start);

        assert_eq!(records.get_record("k"), None);

        records.set_record("k", "v", 30);
        clock.0.set(start + Duration::days(30) + Duration::seconds(1));
        assert_eq!(records.get_record("k"), None);
    }

    #[test]
    fn rewriting_extends_expiry() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let (mut records, clock) = records_at(start);

        records.set_record("k", "old", 30);
        clock.0.set(start + Duration::days(20));
        records.set_record("k", "new", 30);
        clock.0.set(start + Duration::days(40));

        assert_eq!(records.get_record("k").as_deref(), Some("new"));
    }

    #[test]
    fn seconds_reject_non_numeric_values() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let (mut records, _clock) = records_at(start);

        records.set_record(CURRENT_PLAY_TIME, "12.75", RECORD_TTL_DAYS);
        records.set_record("broken", "twelve", RECORD_TTL_DAYS);
        records.set_record("nan", "NaN", RECORD_TTL_DAYS);

        assert_eq!(records.get_seconds(CURRENT_PLAY_TIME), Some(12.75));
        assert_eq!(records.get_seconds("broken"), None);
        assert_eq!(records.get_seconds("nan"), None);
        assert_eq!(records.get_seconds("missing"), None);
    }

    #[test]
    fn per_item_key_embeds_identifier() {
        assert_eq!(item_play_time_key("a.mp4"), "currentPlayTime_a.mp4");
    }
}
