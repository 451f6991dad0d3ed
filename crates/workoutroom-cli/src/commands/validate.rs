use clap::Args;
use std::path::Path;
use workoutroom_core::validation::ValidationScope;
use workoutroom_core::{Config, Difficulty, DraftConfig, Validator, WizardStep};

use super::load_catalog;

#[derive(Args)]
pub struct ValidateArgs {
    /// Work interval in seconds (defaults to the configured default)
    #[arg(long)]
    work: Option<u32>,
    /// Rest interval in seconds
    #[arg(long)]
    rest: Option<u32>,
    /// Preparation countdown in seconds
    #[arg(long)]
    prep: Option<u32>,
    /// Number of rounds
    #[arg(long)]
    rounds: Option<u32>,
    /// Comma-separated exercise IDs
    #[arg(long, value_delimiter = ',')]
    exercises: Vec<String>,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Only the rules of one wizard step (1 timing, 2 exercises, 3 review)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    step: Option<u8>,
}

pub fn run(args: ValidateArgs, catalog: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    let config = Config::load_or_default();
    let limits = config.timing.clone();

    let mut draft = DraftConfig::with_defaults(&limits);
    draft.work_seconds = args.work.unwrap_or(draft.work_seconds);
    draft.rest_seconds = args.rest.unwrap_or(draft.rest_seconds);
    draft.prep_seconds = args.prep.unwrap_or(draft.prep_seconds);
    draft.rounds = args.rounds.unwrap_or(draft.rounds);
    draft.exercises = args.exercises;
    draft.name = args.name;
    draft.description = args.description;
    draft.difficulty = args.difficulty;
    draft.recompute_estimate();

    let scope = match args.step.and_then(WizardStep::from_number) {
        Some(step) => ValidationScope::Step(step),
        None => ValidationScope::Full,
    };
    let mut validator = Validator::new(catalog, limits, config.validation.cache_capacity);
    let report = validator.validate(&draft, scope);

    let json = serde_json::json!({
        "estimated_minutes": draft.estimated_minutes,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
