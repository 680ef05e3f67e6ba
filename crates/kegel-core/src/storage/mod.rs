mod config;
pub mod database;
pub mod export;
pub mod stats;

pub use config::Config;
pub use database::{Database, NewSessionRecord, SessionRecord};
pub use export::{Snapshot, EXPORT_VERSION};
pub use stats::{Achievement, Stats};

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{ConfigError, Result};

/// Append-only sink for finished or abandoned sessions.
pub trait SessionStore {
    /// Persist `record`, returning it with its assigned id.
    fn save_session_record(&self, record: NewSessionRecord) -> Result<SessionRecord>;
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn save_session_record(&self, record: NewSessionRecord) -> Result<SessionRecord> {
        (**self).save_session_record(record)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn save_session_record(&self, record: NewSessionRecord) -> Result<SessionRecord> {
        (**self).save_session_record(record)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `KEGEL_COACH_DATA_DIR` overrides the location outright. Otherwise it is
/// `~/.config/kegel-coach[-dev]/`, with `KEGEL_COACH_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("KEGEL_COACH_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("KEGEL_COACH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("kegel-coach-dev")
            } else {
                base_dir.join("kegel-coach")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
