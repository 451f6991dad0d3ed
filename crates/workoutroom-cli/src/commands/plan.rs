use clap::Subcommand;
use std::path::Path;

use super::load_catalog;

#[derive(Subcommand)]
pub enum PlanAction {
    /// List all workout plans
    List,
    /// Show a plan with its exercises resolved
    Show {
        /// Plan ID (e.g. "quick-start")
        id: String,
    },
}

pub fn run(action: PlanAction, catalog: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog)?;
    match action {
        PlanAction::List => {
            let json = serde_json::to_string_pretty(catalog.plans())?;
            println!("{json}");
        }
        PlanAction::Show { id } => {
            let plan = catalog
                .plan(&id)
                .ok_or_else(|| format!("plan not found: {id}"))?;
            let exercises = catalog.resolve_exercises(plan)?;
            let json = serde_json::json!({
                "plan": plan,
                "exercises": exercises,
                "total_exercise_count": plan.total_exercise_count(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
