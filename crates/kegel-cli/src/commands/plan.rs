use clap::{Args, Subcommand};
use kegel_core::{calculate_plan_duration, TrainingPlan};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List preset plans
    List,
    /// Show one preset as JSON
    Show {
        /// Preset name (beginner, intermediate, advanced)
        name: String,
    },
    /// Preview the length of a custom plan
    Preview(CustomPlanArgs),
}

/// Parameters of a custom plan.
#[derive(Args, Debug, Clone)]
pub struct CustomPlanArgs {
    /// Seconds to hold each contraction
    #[arg(long)]
    pub contract: u64,
    /// Seconds to relax after each contraction
    #[arg(long)]
    pub relax: u64,
    /// Number of sets
    #[arg(long)]
    pub sets: u32,
    /// Repetitions per set
    #[arg(long)]
    pub reps: u32,
    /// Seconds of rest between sets
    #[arg(long, default_value = "0")]
    pub rest: u64,
}

impl CustomPlanArgs {
    pub fn to_plan(&self) -> Result<TrainingPlan, kegel_core::ValidationError> {
        TrainingPlan::custom(self.contract, self.relax, self.sets, self.reps, self.rest)
    }
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::List => {
            for plan in TrainingPlan::presets() {
                println!(
                    "{:<13} {}s/{}s  {} x {}  rest {}s  ~{} min",
                    plan.name,
                    plan.contract_secs,
                    plan.relax_secs,
                    plan.sets,
                    plan.reps_per_set,
                    plan.rest_secs,
                    calculate_plan_duration(&plan),
                );
            }
        }
        PlanAction::Show { name } => {
            let plan = TrainingPlan::preset(&name)
                .ok_or_else(|| kegel_core::ValidationError::UnknownPreset(name.clone()))?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        PlanAction::Preview(args) => {
            let plan = args.to_plan()?;
            println!("{} min", calculate_plan_duration(&plan));
        }
    }
    Ok(())
}
