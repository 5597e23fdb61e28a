use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{info, warn};

use crate::yaml;

/// Fields a known exporter defect can leave null in place of a string.
/// Only these are repaired; nulls anywhere else pass through untouched.
const REPAIRABLE_FIELDS: &[&str] = &["ingredients", "directions"];

/// Load, repair, and collect previously converted recipe files into one
/// sequence, preserving input order. A file that cannot be read, decoded,
/// or re-encoded after repair is logged and dropped without affecting the
/// rest.
pub fn merge_files(paths: &[PathBuf]) -> Vec<Value> {
    let mut recipes = Vec::with_capacity(paths.len());
    for path in paths {
        info!("loading {}", path.display());
        if let Some(recipe) = load_one(path) {
            recipes.push(recipe);
        }
    }
    recipes
}

fn load_one(path: &Path) -> Option<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("failed to read {}: {e}", path.display());
            return None;
        }
    };
    let mut recipe = match yaml::decode(&text) {
        Ok(value) => value,
        Err(e) => {
            warn!("failed to load {}: {e}", path.display());
            return None;
        }
    };

    let Some(mapping) = recipe.as_mapping_mut() else {
        warn!("{} is not a recipe mapping", path.display());
        return None;
    };
    for field in REPAIRABLE_FIELDS {
        if mapping.get(*field) == Some(&Value::Null) {
            warn!("fixing null `{field}` in {}", path.display());
            mapping.insert((*field).into(), "".into());
        }
    }

    // The repaired record must still serialize before it may join the
    // merged output.
    match yaml::encode(&recipe) {
        Ok(_) => Some(recipe),
        Err(e) => {
            warn!("bad recipe file {}: {e}; content: {recipe:?}", path.display());
            None
        }
    }
}
