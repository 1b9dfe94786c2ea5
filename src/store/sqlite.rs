use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::cookie::parse_assignment;
use super::{RecordStore, StoreError};

/// Record store persisted in a SQLite file, so records outlive the process.
pub struct SqliteJar {
    conn: Connection,
}

impl SqliteJar {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let jar = Self { conn };
        jar.init_schema()?;
        Ok(jar)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let jar = Self {
            conn: Connection::open_in_memory()?,
        };
        jar.init_schema()?;
        Ok(jar)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS records (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER
            );
            ",
        )?;
        Ok(())
    }
}

impl RecordStore for SqliteJar {
    fn cookie_string(&mut self, now: DateTime<Utc>) -> Result<String, StoreError> {
        self.conn.execute(
            "DELETE FROM records WHERE expires_at IS NOT NULL AND expires_at <= ?",
            params![now.timestamp()],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT name, value FROM records ORDER BY rowid")?;
        let pairs = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let value: String = row.get(1)?;
            Ok(format!("{}={}", name, value))
        })?;

        let pairs = pairs.collect::<Result<Vec<_>, _>>()?;
        Ok(pairs.join("; "))
    }

    fn assign(&mut self, assignment: &str) -> Result<(), StoreError> {
        let parsed = parse_assignment(assignment)?;
        self.conn.execute(
            "INSERT INTO records (name, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at",
            params![
                parsed.name,
                parsed.value,
                parsed.expires.map(|at| at.timestamp()),
            ],
        )?;
        Ok(())
    }
}
