//! JSON snapshot export/import of everything the app persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Config, Database, SessionRecord, Stats};
use crate::error::Result;

/// Format version embedded in every snapshot.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub settings: Config,
    pub stats: Stats,
    pub sessions: Vec<SessionRecord>,
}

impl Snapshot {
    /// Collect settings, stats and the full session list.
    pub fn capture(db: &Database, settings: &Config) -> Result<Self> {
        Ok(Self {
            version: EXPORT_VERSION.to_string(),
            exported_at: Utc::now(),
            settings: settings.clone(),
            stats: db.stats()?,
            sessions: db.all_sessions()?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, migrating it if it was written by another version.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version == EXPORT_VERSION {
            return Ok(snapshot);
        }
        tracing::info!(from = %snapshot.version, to = EXPORT_VERSION, "migrating snapshot");
        Ok(migrate(snapshot))
    }

    /// Replace stored sessions and stats with this snapshot's and return
    /// its settings for the caller to save.
    pub fn restore(self, db: &mut Database) -> Result<Config> {
        self.settings.validate()?;
        db.replace_all(&self.sessions, &self.stats)?;
        Ok(self.settings)
    }
}

/// Bring an older snapshot up to [`EXPORT_VERSION`]. No format changes
/// exist yet, so only the version is rewritten.
fn migrate(mut snapshot: Snapshot) -> Snapshot {
    snapshot.version = EXPORT_VERSION.to_string();
    snapshot
}
