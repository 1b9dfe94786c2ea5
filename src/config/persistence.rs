use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::warn;

const APP_DIR: &str = "playr";
const DB_FILE: &str = "playr.db";
const LOG_FILE: &str = "playr.log";

pub const DEFAULT_SKIP_SECONDS: &str = "10";

/// Where the database and log live: `<data dir>/playr`.
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not find a data directory"))?;
    Ok(base.join(APP_DIR))
}

pub fn database_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(LOG_FILE))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Raw text of the skip field, parsed only when a skip happens.
    pub skip_seconds: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            skip_seconds: DEFAULT_SKIP_SECONDS.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedSelection {
    paths: Vec<PathBuf>,
}

/// Application settings and the last selection batch.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Single-row table holding the last picked files
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                selection TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        if let Some(v) = self.get_config_value("skip_seconds")? {
            config.skip_seconds = v;
        }

        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        self.set_config_value("skip_seconds", &config.skip_seconds)?;
        Ok(())
    }

    fn get_config_value(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(result)
    }

    fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Paths of the last selection, in pick order. Unreadable rows give an
    /// empty selection.
    pub fn load_selection(&self) -> Result<Vec<PathBuf>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT selection FROM session WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(json) = json else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<SavedSelection>(&json) {
            Ok(saved) => Ok(saved.paths),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable saved selection");
                Ok(Vec::new())
            }
        }
    }

    pub fn save_selection(&self, paths: &[PathBuf]) -> Result<()> {
        let saved = SavedSelection {
            paths: paths.to_vec(),
        };
        let json = serde_json::to_string(&saved)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO session (id, selection) VALUES (1, ?)",
            params![json],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_then_round_trips() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load_config().unwrap().skip_seconds, "10");

        db.save_config(&AppConfig {
            skip_seconds: String::from("85"),
        })
        .unwrap();
        assert_eq!(db.load_config().unwrap().skip_seconds, "85");
    }

    #[test]
    fn selection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("playr.db");
        let picked = vec![PathBuf::from("/m/b.mp4"), PathBuf::from("/m/a.mp4")];

        Database::open(&path).unwrap().save_selection(&picked).unwrap();
        let reopened = Database::open(&path).unwrap();
        assert_eq!(reopened.load_selection().unwrap(), picked);
    }

    #[test]
    fn corrupt_selection_reads_as_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_selection().unwrap().is_empty());

        db.conn
            .execute("INSERT INTO session (id, selection) VALUES (1, 'nope')", [])
            .unwrap();
        assert!(db.load_selection().unwrap().is_empty());
    }
}
