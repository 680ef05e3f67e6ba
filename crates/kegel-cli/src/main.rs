use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "kegel-cli", version, about = "Kegel Coach CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Training plans
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Run an exercise session in the terminal
    Run(commands::run::RunArgs),
    /// Recent sessions
    History {
        /// Number of sessions to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export settings, stats and history as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Replace settings, stats and history from an exported JSON file
    Import {
        file: std::path::PathBuf,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Run(args) => commands::run::run(args),
        Commands::History { limit, json } => commands::history::run(limit, json),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Export { output } => commands::transfer::export(output),
        Commands::Import { file } => commands::transfer::import(&file),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "kegel-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
