pub mod cookie;
pub mod memory;
pub mod records;
pub mod sqlite;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::MemoryJar;
pub use records::{Records, RECORD_TTL_DAYS};
pub use sqlite::SqliteJar;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed record assignment: {0}")]
    MalformedAssignment(String),
    #[error("record database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("record store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A per-origin string record area with per-record expiry.
///
/// Reads return every live record as one `name=value; name2=value2` string;
/// writes take a single `name=value;expires=<http-date>;path=/` assignment.
pub trait RecordStore {
    fn cookie_string(&mut self, now: DateTime<Utc>) -> Result<String, StoreError>;
    fn assign(&mut self, assignment: &str) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn cookie_string(&mut self, now: DateTime<Utc>) -> Result<String, StoreError> {
        (**self).cookie_string(now)
    }

    fn assign(&mut self, assignment: &str) -> Result<(), StoreError> {
        (**self).assign(assignment)
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
