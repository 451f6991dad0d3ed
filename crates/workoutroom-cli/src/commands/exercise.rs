use clap::Subcommand;
use std::path::Path;
use workoutroom_core::{Difficulty, Exercise};

use super::load_catalog;

#[derive(Subcommand)]
pub enum ExerciseAction {
    /// List exercises
    List {
        /// Only exercises of this difficulty (beginner, intermediate, advanced)
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Only exercises for this muscle group (e.g. "core", "full_body")
        #[arg(long)]
        muscle: Option<String>,
    },
    /// Show one exercise
    Show {
        /// Exercise ID (e.g. "burpees")
        id: String,
    },
}

pub fn run(
    action: ExerciseAction,
    catalog: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    match action {
        ExerciseAction::List { difficulty, muscle } => {
            let exercises: Vec<&Exercise> = catalog
                .exercises()
                .filter(|e| difficulty.map_or(true, |d| e.difficulty == d))
                .filter(|e| {
                    muscle
                        .as_deref()
                        .map_or(true, |m| e.muscle_group.as_str() == m)
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&exercises)?);
        }
        ExerciseAction::Show { id } => {
            let exercise = catalog
                .exercise(&id)
                .ok_or_else(|| format!("exercise not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(exercise)?);
        }
    }
    Ok(())
}
