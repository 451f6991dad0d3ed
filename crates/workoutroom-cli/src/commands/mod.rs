pub mod config;
pub mod exercise;
pub mod plan;
pub mod run;
pub mod simulate;
pub mod validate;

use std::path::Path;
use std::sync::Arc;
use workoutroom_core::Catalog;

/// The catalog at `path`, or the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<Arc<Catalog>, Box<dyn std::error::Error>> {
    let catalog = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading catalog");
            Catalog::load(path)?
        }
        None => Catalog::builtin(),
    };
    Ok(Arc::new(catalog))
}
