//! In-memory fetch caches for the recipe API
//!
//! One store per query shape: the category list, meals by category, meal
//! details by id and searches by normalized query. Entries live for the
//! lifetime of the store and are never evicted. Each store records loading
//! and error state per request key, and drops responses that were superseded
//! by a newer request before they landed.

mod categories;
mod meal_detail;
mod meals;
mod search;
mod status;

#[cfg(test)]
pub(crate) mod fake;

pub use categories::CategoriesStore;
pub use meal_detail::{MealDetailStore, MealLookup};
pub use meals::MealsStore;
pub use search::{normalize_query, SearchStore};
pub use status::RequestStatus;
