//! Interactive session runner.
//!
//! Ticks the session on a fixed interval and prints its events. Enter `p`
//! to pause or resume, `q` (or Ctrl-C) to stop.

use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::time::Duration;

use clap::Args;
use kegel_core::storage::Database;
use kegel_core::{
    calculate_plan_duration, Config, Cue, Event, ExerciseSession, Phase, PlanChoice,
    SessionSummary, SystemClock, TrainingPlan,
};
use tokio::time::MissedTickBehavior;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Preset plan name; defaults to the configured plan
    pub plan: Option<String>,
    /// Custom plan: seconds to hold each contraction
    #[arg(long, requires_all = ["relax", "sets", "reps"], conflicts_with = "plan")]
    pub contract: Option<u64>,
    /// Custom plan: seconds to relax after each contraction
    #[arg(long, requires = "contract")]
    pub relax: Option<u64>,
    /// Custom plan: number of sets
    #[arg(long, requires = "contract")]
    pub sets: Option<u32>,
    /// Custom plan: repetitions per set
    #[arg(long, requires = "contract")]
    pub reps: Option<u32>,
    /// Custom plan: seconds of rest between sets
    #[arg(long, requires = "contract", default_value = "0")]
    pub rest: u64,
    /// Do not record the session in history
    #[arg(long)]
    pub no_save: bool,
}

impl RunArgs {
    fn plan_choice(&self, config: &Config) -> Result<PlanChoice, kegel_core::ValidationError> {
        if let (Some(contract), Some(relax), Some(sets), Some(reps)) =
            (self.contract, self.relax, self.sets, self.reps)
        {
            return TrainingPlan::custom(contract, relax, sets, reps, self.rest)
                .map(PlanChoice::Custom);
        }
        Ok(match &self.plan {
            Some(name) => PlanChoice::Preset(name.clone()),
            None => config.default_plan_choice(),
        })
    }
}

enum Command {
    TogglePause,
    Stop,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let choice = args.plan_choice(&config)?;
    let plan = choice.resolve()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(plan, config, !args.no_save))
}

async fn drive(
    plan: TrainingPlan,
    config: Config,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (events_tx, events_rx) = mpsc::channel();
    let mut session = ExerciseSession::new(SystemClock)
        .with_notifier(events_tx)
        .with_settings(config.clone());
    if save {
        session = session.with_store(Database::open()?);
    }

    let mut view = TerminalView::new(plan.clone(), &config.language);
    if !session.start(plan) {
        return Err("could not start the session".into());
    }
    view.drain(&events_rx);

    let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let cmd = match line.trim() {
                "p" => Command::TogglePause,
                "q" => Command::Stop,
                _ => continue,
            };
            if cmd_tx.send(cmd).is_err() {
                break;
            }
        }
    });

    let mut interval =
        tokio::time::interval(Duration::from_millis(config.training.tick_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // One listener for the whole run.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => session.tick(),
            Some(cmd) = cmd_rx.recv() => match cmd {
                Command::TogglePause => {
                    if session.is_paused() {
                        session.resume();
                    } else {
                        session.pause();
                    }
                }
                Command::Stop => {
                    session.stop();
                }
            },
            _ = &mut ctrl_c => {
                session.stop();
            }
        }
        view.drain(&events_rx);
        if !session.is_active() {
            break;
        }
    }
    Ok(())
}

/// Renders session events as terminal lines.
struct TerminalView {
    plan: TrainingPlan,
    chinese: bool,
}

impl TerminalView {
    fn new(plan: TrainingPlan, language: &str) -> Self {
        Self {
            plan,
            chinese: language == "zh",
        }
    }

    fn drain(&mut self, events: &mpsc::Receiver<Event>) {
        for event in events.try_iter() {
            self.render(event);
        }
        let _ = std::io::stdout().flush();
    }

    fn phase_label(&self, phase: Phase) -> &'static str {
        match (phase, self.chinese) {
            (Phase::Prepare, false) => "Get ready",
            (Phase::Contract, false) => "Contract",
            (Phase::Relax, false) => "Relax",
            (Phase::Rest, false) => "Rest",
            (Phase::Complete, false) => "Done",
            (Phase::Prepare, true) => "准备",
            (Phase::Contract, true) => "收缩",
            (Phase::Relax, true) => "放松",
            (Phase::Rest, true) => "休息",
            (Phase::Complete, true) => "完成",
        }
    }

    fn intro(&self, plan_name: &str) -> String {
        format!(
            "{plan_name}: about {} min. p = pause/resume, q = stop",
            calculate_plan_duration(&self.plan)
        )
    }

    fn render(&mut self, event: Event) {
        match event {
            Event::SessionStarted { plan_name, .. } => println!("{}", self.intro(&plan_name)),
            Event::StateChanged { active: true, paused: false, phase, current_set, current_rep, total_phase_secs, .. } => {
                print!(
                    "\nset {current_set}/{} rep {current_rep}/{}  {:<10} {total_phase_secs:>3}s",
                    self.plan.sets,
                    self.plan.reps_per_set,
                    self.phase_label(phase),
                );
            }
            Event::TimerTick { remaining_secs, progress, .. } => {
                print!("\r{:>3}s left  {:>3.0}%   ", remaining_secs, progress * 100.0);
            }
            Event::Cue { sound: true, cue, .. } => {
                // Terminal bell stands in for audio; a double bell marks the end.
                print!("{}", if cue == Cue::Complete { "\x07\x07" } else { "\x07" });
            }
            Event::Paused { remaining_secs, .. } => {
                print!("\npaused with {remaining_secs}s left in this phase");
            }
            Event::AutoPaused { hidden_ms, .. } => {
                print!("\npaused after {}s in the background", hidden_ms / 1000);
            }
            Event::Resumed { .. } => print!("\nresumed"),
            Event::SessionCompleted { summary, .. } => self.print_summary("completed", &summary),
            Event::SessionStopped { summary, .. } => self.print_summary("stopped", &summary),
            _ => {}
        }
    }

    fn print_summary(&self, verb: &str, summary: &SessionSummary) {
        println!(
            "\n{} {verb}: {} sets, {} reps in {}:{:02}{}",
            summary.plan_name,
            summary.completed_sets,
            summary.completed_reps,
            summary.duration_secs / 60,
            summary.duration_secs % 60,
            if summary.record_id.is_some() { "" } else { " (not saved)" },
        );
    }
}
