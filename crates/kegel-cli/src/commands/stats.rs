use clap::Subcommand;
use kegel_core::storage::{Achievement, Database, Stats};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show totals, streaks and achievements
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild stats from the session history
    Repair,
}

fn print_stats(stats: &Stats) {
    let today = chrono::Local::now().date_naive();
    println!("sessions:        {}", stats.total_sessions);
    println!("total time:      {} min", stats.total_duration_secs / 60);
    println!("current streak:  {} days", stats.effective_current_streak(today));
    println!("best streak:     {} days", stats.max_streak);
    println!("achievements:");
    for achievement in Achievement::ALL {
        let mark = if stats.achievements.contains(&achievement) { "x" } else { " " };
        println!("  [{mark}] {}", achievement.title());
    }
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Show { json } => {
            let stats = db.stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        StatsAction::Repair => {
            let stats = db.repair_stats()?;
            print_stats(&stats);
        }
    }
    Ok(())
}
