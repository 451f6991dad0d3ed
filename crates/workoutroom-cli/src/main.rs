use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "workoutroom-cli", version, about = "Workoutroom CLI")]
struct Cli {
    /// Load exercises and plans from a TOML catalog instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Workout plans
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Exercise catalog
    Exercise {
        #[command(subcommand)]
        action: commands::exercise::ExerciseAction,
    },
    /// Validate a draft workout configuration
    Validate(commands::validate::ValidateArgs),
    /// Run a plan tick by tick without waiting
    Simulate(commands::simulate::SimulateArgs),
    /// Run a plan in real time
    Run(commands::run::RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("WORKOUTROOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = cli.catalog.as_deref();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action, catalog),
        Commands::Exercise { action } => commands::exercise::run(action, catalog),
        Commands::Validate(args) => commands::validate::run(args, catalog),
        Commands::Simulate(args) => commands::simulate::run(args, catalog),
        Commands::Run(args) => commands::run::run(args, catalog),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
