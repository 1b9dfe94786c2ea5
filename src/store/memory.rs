use chrono::{DateTime, Utc};

use super::cookie::parse_assignment;
use super::{RecordStore, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// Record store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryJar {
    entries: Vec<Entry>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryJar {
    fn cookie_string(&mut self, now: DateTime<Utc>) -> Result<String, StoreError> {
        self.entries
            .retain(|e| e.expires.map_or(true, |expires| expires > now));

        Ok(self
            .entries
            .iter()
            .map(|e| format!("{}={}", e.name, e.value))
            .collect::<Vec<_>>()
            .join("; "))
    }

    fn assign(&mut self, assignment: &str) -> Result<(), StoreError> {
        let parsed = parse_assignment(assignment)?;

        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == parsed.name) {
            existing.value = parsed.value;
            existing.expires = parsed.expires;
        } else {
            self.entries.push(Entry {
                name: parsed.name,
                value: parsed.value,
                expires: parsed.expires,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn overwrite_keeps_one_entry_in_original_position() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut jar = MemoryJar::new();
        jar.assign("a=1;expires=Sat, 31 Jan 2026 00:00:00 GMT;path=/").unwrap();
        jar.assign("b=2;expires=Sat, 31 Jan 2026 00:00:00 GMT;path=/").unwrap();
        jar.assign("a=3;expires=Sat, 31 Jan 2026 00:00:00 GMT;path=/").unwrap();

        assert_eq!(jar.cookie_string(now).unwrap(), "a=3; b=2");
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut jar = MemoryJar::new();
        jar.assign("a=1;expires=Fri, 02 Jan 2026 00:00:00 GMT;path=/").unwrap();

        assert_eq!(jar.cookie_string(now).unwrap(), "a=1");
        assert_eq!(jar.cookie_string(now + Duration::days(2)).unwrap(), "");
        assert_eq!(jar.cookie_string(now).unwrap(), "");
    }
}
