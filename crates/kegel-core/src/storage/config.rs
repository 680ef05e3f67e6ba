//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Sound and vibration cues
//! - Display language
//! - The default plan and an optional saved custom plan
//!
//! Configuration is stored at `~/.config/kegel-coach/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::exercise::{CueSettings, SettingsProvider, TICK_INTERVAL_MS};
use crate::plan::{PlanChoice, TrainingPlan};

const LANGUAGES: [&str; 2] = ["en", "zh"];

/// Cue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
}

/// Training configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Preset name, or `custom` for the saved custom plan.
    #[serde(default = "default_plan")]
    pub default_plan: String,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/kegel-coach/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub custom_plan: Option<TrainingPlan>,
}

fn default_true() -> bool {
    true
}
fn default_plan() -> String {
    "beginner".into()
}
fn default_tick_interval_ms() -> u64 {
    TICK_INTERVAL_MS
}
fn default_language() -> String {
    "en".into()
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            default_plan: default_plan(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            cues: CuesConfig::default(),
            training: TrainingConfig::default(),
            custom_plan: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                    // Objects and unset optionals take raw JSON.
                    _ => serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?,
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or validate; the config is left unchanged in that case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LANGUAGES.contains(&self.language.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "language".into(),
                message: format!("expected one of {LANGUAGES:?}"),
            });
        }
        if self.training.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "training.tick_interval_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        if let Some(plan) = &self.custom_plan {
            plan.validate().map_err(|e| ConfigError::InvalidValue {
                key: "custom_plan".into(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// The plan `run` uses when none is given.
    pub fn default_plan_choice(&self) -> PlanChoice {
        match (&self.custom_plan, self.training.default_plan.as_str()) {
            (Some(plan), "custom") => PlanChoice::Custom(plan.clone()),
            (_, name) => PlanChoice::Preset(name.to_string()),
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default config: {e}");
            Self::default()
        })
    }
}

impl SettingsProvider for Config {
    fn cue_settings(&self) -> CueSettings {
        CueSettings {
            sound_enabled: self.cues.sound,
            vibration_enabled: self.cues.vibration,
        }
    }
}
