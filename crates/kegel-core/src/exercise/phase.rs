use serde::{Deserialize, Serialize};

use crate::plan::{TrainingPlan, PREPARE_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Prepare,
    Contract,
    Relax,
    Rest,
    Complete,
}

/// Audible/haptic cue played on entering a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Contract,
    Relax,
    Rest,
    Complete,
}

/// Result of leaving a phase whose time ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: Phase,
    pub set: u32,
    pub rep: u32,
    pub cue: Cue,
}

impl Phase {
    /// Length of this phase under `plan`. `Complete` has no length.
    pub fn duration_secs(self, plan: &TrainingPlan) -> u64 {
        match self {
            Phase::Prepare => PREPARE_SECS,
            Phase::Contract => plan.contract_secs,
            Phase::Relax => plan.relax_secs,
            Phase::Rest => plan.rest_secs,
            Phase::Complete => 0,
        }
    }

    /// Whether time in this phase counts toward the current rep.
    pub fn is_rep_phase(self) -> bool {
        matches!(self, Phase::Contract | Phase::Relax)
    }

    /// Transition table applied when this phase's time runs out.
    ///
    /// Returns `None` for `Complete`, which is terminal.
    pub fn next(self, set: u32, rep: u32, plan: &TrainingPlan) -> Option<Transition> {
        let contract = |set, rep| Transition {
            to: Phase::Contract,
            set,
            rep,
            cue: Cue::Contract,
        };
        match self {
            Phase::Prepare | Phase::Rest => Some(contract(set, rep)),
            Phase::Contract => Some(Transition {
                to: Phase::Relax,
                set,
                rep,
                cue: Cue::Relax,
            }),
            Phase::Relax if rep < plan.reps_per_set => Some(contract(set, rep + 1)),
            Phase::Relax if set < plan.sets => Some(Transition {
                to: Phase::Rest,
                set: set + 1,
                rep: 1,
                cue: Cue::Rest,
            }),
            Phase::Relax => Some(Transition {
                to: Phase::Complete,
                set,
                rep,
                cue: Cue::Complete,
            }),
            Phase::Complete => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Prepare => "prepare",
            Phase::Contract => "contract",
            Phase::Relax => "relax",
            Phase::Rest => "rest",
            Phase::Complete => "complete",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> TrainingPlan {
        TrainingPlan::custom(4, 6, 2, 2, 20).unwrap()
    }

    #[test]
    fn durations_follow_plan() {
        let plan = plan();
        assert_eq!(Phase::Prepare.duration_secs(&plan), 3);
        assert_eq!(Phase::Contract.duration_secs(&plan), 4);
        assert_eq!(Phase::Relax.duration_secs(&plan), 6);
        assert_eq!(Phase::Rest.duration_secs(&plan), 20);
    }

    #[test]
    fn relax_loops_back_to_contract_within_set() {
        let t = Phase::Relax.next(1, 1, &plan()).unwrap();
        assert_eq!((t.to, t.set, t.rep, t.cue), (Phase::Contract, 1, 2, Cue::Contract));
    }

    #[test]
    fn relax_after_last_rep_rests_before_next_set() {
        let t = Phase::Relax.next(1, 2, &plan()).unwrap();
        assert_eq!((t.to, t.set, t.rep, t.cue), (Phase::Rest, 2, 1, Cue::Rest));
    }

    #[test]
    fn relax_after_last_rep_of_last_set_completes() {
        let t = Phase::Relax.next(2, 2, &plan()).unwrap();
        assert_eq!((t.to, t.set, t.rep), (Phase::Complete, 2, 2));
        assert_eq!(t.cue, Cue::Complete);
    }

    #[test]
    fn complete_is_terminal() {
        assert!(Phase::Complete.next(2, 2, &plan()).is_none());
    }
}
