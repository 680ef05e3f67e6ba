use kegel_core::storage::Database;

pub fn run(limit: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.list_sessions(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }
    if sessions.is_empty() {
        println!("no sessions yet");
        return Ok(());
    }
    for s in sessions {
        let local = s.date.with_timezone(&chrono::Local);
        println!(
            "{}  {:<13} {:>4}s  {} sets / {} reps  {}",
            local.format("%Y-%m-%d %H:%M"),
            s.plan_name,
            s.duration_secs,
            s.completed_sets,
            s.completed_reps,
            if s.completed { "completed" } else { "stopped" },
        );
    }
    Ok(())
}
