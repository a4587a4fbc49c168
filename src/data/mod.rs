//! Core data models for the MealDB client
//!
//! This module contains the records returned by the remote recipe API:
//! categories, meal summaries and full meal details, plus the HTTP client
//! that fetches them.

pub mod client;
pub mod ingredients;

pub use client::{ApiError, ClientConfig, RecipeApi, RecipeClient, DEFAULT_BASE_URL};
pub use ingredients::{extract_ingredients, Ingredient, MAX_INGREDIENTS};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Description used when a category cannot be found upstream
pub const MISSING_DESCRIPTION: &str = "No description available.";

/// A named grouping of meals (e.g. "Seafood")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Upstream identifier
    #[serde(rename = "idCategory", deserialize_with = "null_as_empty")]
    pub id: String,
    /// Display name, also used as the key for meals-by-category lookups
    #[serde(rename = "strCategory", deserialize_with = "null_as_empty")]
    pub name: String,
    /// Thumbnail image URL
    #[serde(rename = "strCategoryThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
    /// Free-text description
    #[serde(
        rename = "strCategoryDescription",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub description: String,
}

impl Category {
    /// Builds a stand-in category for a name the upstream list does not contain
    pub fn placeholder(name: &str) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            thumbnail: String::new(),
            description: MISSING_DESCRIPTION.to_string(),
        }
    }
}

/// Summary form of a meal, as returned by category listings and search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(rename = "idMeal", deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(rename = "strMeal", deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
    /// Only present in search results; category listings omit it
    #[serde(
        rename = "strCategory",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
}

/// Full meal record returned by the lookup endpoint
///
/// Every field the model does not name explicitly (the numbered
/// `strIngredientN`/`strMeasureN` pairs, tags, source links, ...) is kept in
/// `attributes`. Use [`MealDetail::ingredients`] to read the ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDetail {
    #[serde(rename = "idMeal", deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(rename = "strMeal", deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
    #[serde(rename = "strCategory", default, deserialize_with = "null_as_empty")]
    pub category: String,
    /// Cuisine of origin (e.g. "Italian")
    #[serde(rename = "strArea", default, deserialize_with = "null_as_empty")]
    pub area: String,
    #[serde(rename = "strInstructions", default, deserialize_with = "null_as_empty")]
    pub instructions: String,
    /// Video link; blank upstream values are read as `None`
    #[serde(
        rename = "strYoutube",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub youtube: Option<String>,
    /// Remaining upstream attributes
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl MealDetail {
    /// Returns the ordered (name, measure) pairs of this meal
    pub fn ingredients(&self) -> Vec<Ingredient> {
        extract_ingredients(&self.attributes)
    }
}

/// Reads a JSON `null` string field as empty text
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads `null` or whitespace-only text as `None`
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
