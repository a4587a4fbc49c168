//! Rendering of command results as text or JSON

use std::fmt::Write;

use serde_json::json;

use crate::data::{Category, Meal, MealDetail};

/// Result of one command, ready to print
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Categories(Vec<Category>),
    Category(Category),
    /// Listings in the order the categories were requested
    Meals(Vec<(String, Vec<Meal>)>),
    Meal(MealDetail),
    Search {
        query: String,
        searched: bool,
        meals: Vec<Meal>,
    },
}

impl Output {
    /// Renders the result as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let value = match self {
            Output::Categories(categories) => json!({ "categories": categories }),
            Output::Category(category) => json!({ "category": category }),
            Output::Meals(listings) => {
                let map: serde_json::Map<_, _> = listings
                    .iter()
                    .map(|(category, meals)| (category.clone(), json!(meals)))
                    .collect();
                json!({ "meals": map })
            }
            Output::Meal(detail) => json!({
                "meal": detail,
                "ingredients": detail.ingredients(),
            }),
            Output::Search {
                query,
                searched,
                meals,
            } => json!({ "query": query, "searched": searched, "meals": meals }),
        };
        serde_json::to_string_pretty(&value)
    }

    /// Renders the result as human-readable text
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match self {
            Output::Categories(categories) => {
                if categories.is_empty() {
                    out.push_str("No categories found.\n");
                }
                for category in categories {
                    let _ = writeln!(out, "{:>4}  {}", category.id, category.name);
                }
            }
            Output::Category(category) => {
                let _ = writeln!(out, "{}", category.name);
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", category.description.trim());
            }
            Output::Meals(listings) => {
                for (i, (category, meals)) in listings.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    let _ = writeln!(out, "{} ({} meals)", category, meals.len());
                    render_meal_lines(&mut out, meals);
                }
            }
            Output::Meal(detail) => render_detail(&mut out, detail),
            Output::Search {
                query,
                searched,
                meals,
            } => {
                if !searched {
                    out.push_str("Nothing to search for.\n");
                } else if meals.is_empty() {
                    let _ = writeln!(out, "No meals found for \"{}\".", query);
                } else {
                    let _ = writeln!(out, "{} results for \"{}\"", meals.len(), query);
                    render_meal_lines(&mut out, meals);
                }
            }
        }
        out
    }
}

fn render_meal_lines(out: &mut String, meals: &[Meal]) {
    for meal in meals {
        match &meal.category {
            Some(category) => {
                let _ = writeln!(out, "  {:>6}  {} [{}]", meal.id, meal.name, category);
            }
            None => {
                let _ = writeln!(out, "  {:>6}  {}", meal.id, meal.name);
            }
        }
    }
}

fn render_detail(out: &mut String, detail: &MealDetail) {
    let _ = writeln!(out, "{} (#{})", detail.name, detail.id);
    let _ = writeln!(out, "{} · {}", detail.category, detail.area);

    let ingredients = detail.ingredients();
    if !ingredients.is_empty() {
        let _ = writeln!(out, "\nIngredients:");
        for ingredient in &ingredients {
            if ingredient.measure.is_empty() {
                let _ = writeln!(out, "  - {}", ingredient.name);
            } else {
                let _ = writeln!(out, "  - {} ({})", ingredient.name, ingredient.measure);
            }
        }
    }

    if !detail.instructions.trim().is_empty() {
        let _ = writeln!(out, "\nInstructions:");
        let _ = writeln!(out, "{}", detail.instructions.trim());
    }

    if let Some(video) = &detail.youtube {
        let _ = writeln!(out, "\nVideo: {}", video);
    }
}
