//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Finished and abandoned exercise sessions
//! - The aggregate [`Stats`] (kept in the key-value table)
//! - Key-value store for application state

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::stats::{local_day, Stats};
use super::{data_dir, SessionStore};
use crate::error::{DatabaseError, Result};

const STATS_KEY: &str = "stats";

/// A session that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSessionRecord {
    pub date: DateTime<Utc>,
    pub plan_name: String,
    pub duration_secs: u64,
    pub completed: bool,
    pub completed_sets: u32,
    pub completed_reps: u32,
}

/// A saved session. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub plan_name: String,
    pub duration_secs: u64,
    pub completed: bool,
    pub completed_sets: u32,
    pub completed_reps: u32,
}

impl SessionRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, u64, bool, u32, u32)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    }
}

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/kegel-coach.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("kegel-coach.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                date            TEXT NOT NULL,
                plan_name       TEXT NOT NULL,
                duration_secs   INTEGER NOT NULL,
                completed       INTEGER NOT NULL,
                completed_sets  INTEGER NOT NULL,
                completed_reps  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);",
        )?;
        Ok(())
    }

    /// Insert a session record. Completed sessions also update the stored
    /// stats in the same transaction.
    ///
    /// # Errors
    /// Returns an error if the insert or the stats update fails; nothing is
    /// written in that case.
    pub fn record_session(&self, record: NewSessionRecord) -> Result<SessionRecord> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO sessions (date, plan_name, duration_secs, completed, completed_sets, completed_reps)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.date.to_rfc3339(),
                record.plan_name,
                record.duration_secs,
                record.completed,
                record.completed_sets,
                record.completed_reps,
            ],
        )?;
        let saved = SessionRecord {
            id: tx.last_insert_rowid(),
            date: record.date,
            plan_name: record.plan_name,
            duration_secs: record.duration_secs,
            completed: record.completed,
            completed_sets: record.completed_sets,
            completed_reps: record.completed_reps,
        };

        let unlocked = if saved.completed {
            let mut stats: Stats = read_json(&tx, STATS_KEY)?.unwrap_or_default();
            let unlocked = stats.record_completed(saved.duration_secs, local_day(saved.date));
            write_json(&tx, STATS_KEY, &stats)?;
            unlocked
        } else {
            Vec::new()
        };
        tx.commit()?;

        for achievement in &unlocked {
            tracing::info!(achievement = achievement.title(), "achievement unlocked");
        }
        Ok(saved)
    }

    /// Most recent sessions first.
    pub fn list_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, plan_name, duration_secs, completed, completed_sets, completed_reps
             FROM sessions
             ORDER BY date DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], SessionRecord::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, date, plan_name, duration_secs, completed, completed_sets, completed_reps) =
                row?;
            let date = DateTime::parse_from_rfc3339(&date)
                .map_err(|e| DatabaseError::CorruptRow {
                    table: "sessions".into(),
                    message: format!("id {id}: {e}"),
                })?
                .with_timezone(&Utc);
            records.push(SessionRecord {
                id,
                date,
                plan_name,
                duration_secs,
                completed,
                completed_sets,
                completed_reps,
            });
        }
        Ok(records)
    }

    pub fn all_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.list_sessions(i64::MAX as usize)
    }

    /// Stored aggregate stats, or empty stats if none were saved yet.
    pub fn stats(&self) -> Result<Stats> {
        Ok(read_json(&self.conn, STATS_KEY)?.unwrap_or_default())
    }

    /// Recompute stats from the full history and store the result.
    pub fn repair_stats(&self) -> Result<Stats> {
        let stats = Stats::from_history(&self.all_sessions()?);
        write_json(&self.conn, STATS_KEY, &stats)?;
        tracing::info!(total_sessions = stats.total_sessions, "stats rebuilt from history");
        Ok(stats)
    }

    /// Replace all sessions and stats, e.g. when importing a snapshot.
    pub fn replace_all(&mut self, sessions: &[SessionRecord], stats: &Stats) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM sessions", [])?;
        for record in sessions {
            tx.execute(
                "INSERT INTO sessions (id, date, plan_name, duration_secs, completed, completed_sets, completed_reps)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.date.to_rfc3339(),
                    record.plan_name,
                    record.duration_secs,
                    record.completed,
                    record.completed_sets,
                    record.completed_reps,
                ],
            )?;
        }
        write_json(&tx, STATS_KEY, stats)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete every session and all stored state.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM sessions; DELETE FROM kv;")?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        kv_get(&self.conn, key)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        kv_set(&self.conn, key, value)
    }

    /// Read a JSON-encoded setting, falling back to `default` when it is
    /// missing or unreadable.
    pub fn read_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match read_json(&self.conn, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, "failed to read setting: {e}");
                default
            }
        }
    }
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    match kv_get(conn, key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn write_json<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    kv_set(conn, key, &serde_json::to_string(value)?)
}

impl SessionStore for Database {
    fn save_session_record(&self, record: NewSessionRecord) -> Result<SessionRecord> {
        self.record_session(record)
    }
}
