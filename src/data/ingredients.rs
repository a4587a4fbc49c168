//! Ingredient extraction for meal details
//!
//! The lookup endpoint spreads ingredients over numbered attribute pairs
//! (`strIngredient1`/`strMeasure1` up to `strIngredient20`/`strMeasure20`).
//! This module turns them into an ordered list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Highest ingredient index the upstream API uses
pub const MAX_INGREDIENTS: usize = 20;

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name (e.g. "Lentils")
    pub name: String,
    /// Quantity text (e.g. "1 cup"), empty when upstream has none
    pub measure: String,
}

/// Collects the ingredient pairs of a meal in index order
///
/// Only pairs whose ingredient name is a non-blank string are returned. Both
/// name and measure are trimmed; a missing or non-string measure is empty.
pub fn extract_ingredients(attributes: &Map<String, Value>) -> Vec<Ingredient> {
    (1..=MAX_INGREDIENTS)
        .filter_map(|i| {
            let name = attributes
                .get(&format!("strIngredient{}", i))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())?;

            let measure = attributes
                .get(&format!("strMeasure{}", i))
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();

            Some(Ingredient {
                name: name.to_string(),
                measure: measure.to_string(),
            })
        })
        .collect()
}
