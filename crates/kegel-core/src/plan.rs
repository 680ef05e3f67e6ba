//! Training plans: the preset catalogue, custom plans and duration math.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Fixed length of the `Prepare` phase that opens every session.
pub const PREPARE_SECS: u64 = 3;

/// Parameter set for one training session.
///
/// Immutable once a session has started with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub name: String,
    pub contract_secs: u64,
    pub relax_secs: u64,
    pub sets: u32,
    pub reps_per_set: u32,
    #[serde(default)]
    pub rest_secs: u64,
}

impl TrainingPlan {
    /// Names of the built-in presets, in display order.
    pub const PRESET_NAMES: [&'static str; 3] = ["beginner", "intermediate", "advanced"];

    /// Look up a built-in preset by name (case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        let (contract, relax, sets, reps, rest) = match name.to_ascii_lowercase().as_str() {
            "beginner" => (3, 3, 3, 10, 30),
            "intermediate" => (5, 5, 3, 12, 45),
            "advanced" => (10, 10, 4, 15, 60),
            _ => return None,
        };
        Some(Self {
            name: name.to_ascii_lowercase(),
            contract_secs: contract,
            relax_secs: relax,
            sets,
            reps_per_set: reps,
            rest_secs: rest,
        })
    }

    pub fn presets() -> Vec<Self> {
        Self::PRESET_NAMES
            .iter()
            .filter_map(|name| Self::preset(name))
            .collect()
    }

    /// Build a user-defined plan named `custom`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if contract, relax, sets or reps is zero.
    pub fn custom(
        contract_secs: u64,
        relax_secs: u64,
        sets: u32,
        reps_per_set: u32,
        rest_secs: u64,
    ) -> Result<Self, ValidationError> {
        let plan = Self {
            name: "custom".into(),
            contract_secs,
            relax_secs,
            sets,
            reps_per_set,
            rest_secs,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Check that every timed field except rest is positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("contract_secs", self.contract_secs),
            ("relax_secs", self.relax_secs),
            ("sets", u64::from(self.sets)),
            ("reps_per_set", u64::from(self.reps_per_set)),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "must be greater than 0".into(),
                });
            }
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn total_reps(&self) -> u32 {
        self.sets.saturating_mul(self.reps_per_set)
    }

    /// Total planned seconds: prepare, every contract/relax cycle and the
    /// rests between sets.
    ///
    /// Uses saturating arithmetic so absurd custom values cannot overflow.
    pub fn duration_secs(&self) -> u64 {
        let cycle = self.contract_secs.saturating_add(self.relax_secs);
        let work = cycle.saturating_mul(u64::from(self.total_reps()));
        let rests = self
            .rest_secs
            .saturating_mul(u64::from(self.sets.saturating_sub(1)));
        PREPARE_SECS.saturating_add(work).saturating_add(rests)
    }
}

/// Planned session length in whole minutes, rounded to nearest.
pub fn calculate_plan_duration(plan: &TrainingPlan) -> u64 {
    (plan.duration_secs() as f64 / 60.0).round() as u64
}

/// What the caller asked `start` to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum PlanChoice {
    Preset(String),
    Custom(TrainingPlan),
}

impl PlanChoice {
    /// Turn the choice into a validated plan.
    pub fn resolve(&self) -> Result<TrainingPlan, ValidationError> {
        match self {
            PlanChoice::Preset(name) => {
                TrainingPlan::preset(name).ok_or_else(|| ValidationError::UnknownPreset(name.clone()))
            }
            PlanChoice::Custom(plan) => {
                plan.validate()?;
                Ok(plan.clone())
            }
        }
    }
}

impl From<&str> for PlanChoice {
    fn from(name: &str) -> Self {
        PlanChoice::Preset(name.to_string())
    }
}

impl From<TrainingPlan> for PlanChoice {
    fn from(plan: TrainingPlan) -> Self {
        PlanChoice::Custom(plan)
    }
}
