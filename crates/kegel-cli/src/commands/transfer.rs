use std::path::{Path, PathBuf};

use kegel_core::storage::{Database, Snapshot};
use kegel_core::Config;

pub fn export(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let json = Snapshot::capture(&db, &config)?.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn import(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(file)?;
    let snapshot = Snapshot::from_json(&json)?;
    let count = snapshot.sessions.len();

    let mut db = Database::open()?;
    let config = snapshot.restore(&mut db)?;
    config.save()?;
    println!("imported {count} sessions");
    Ok(())
}
