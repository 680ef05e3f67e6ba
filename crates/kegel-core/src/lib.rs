//! # Kegel Coach Core Library
//!
//! Core logic for a pelvic-floor exercise coach: interval plans, the
//! phase-based exercise timer, session history and streak statistics.
//! The terminal front end in `kegel-cli` is a thin view over this crate.
//!
//! ## Architecture
//!
//! - **Exercise session**: a wall-clock-based phase state machine that
//!   requires the caller to periodically invoke `tick()`
//! - **Storage**: SQLite-based session storage, derived stats and
//!   TOML-based configuration
//! - **Events**: every state change is reported to an optional notifier
//!
//! ## Key Components
//!
//! - [`ExerciseSession`]: phase state machine and timer
//! - [`TrainingPlan`]: preset and custom plans
//! - [`Database`]: session and statistics persistence
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod exercise;
pub mod plan;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, Notifier, SessionSummary};
pub use exercise::{Cue, CueSettings, ExerciseSession, Phase, SessionSnapshot, SettingsProvider};
pub use plan::{calculate_plan_duration, PlanChoice, TrainingPlan};
pub use storage::{Config, Database, SessionRecord, SessionStore, Snapshot, Stats};
