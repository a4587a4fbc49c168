//! Meals-by-category store
//!
//! Caches meal listings under the exact category name. Fetching always goes
//! to the network; callers decide when a category needs (re)loading.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::status::{lock, RequestStatus, RequestTracker};
use crate::data::{Meal, RecipeApi};

#[derive(Debug, Default)]
struct MealsState {
    by_category: HashMap<String, Vec<Meal>>,
    requests: RequestTracker,
}

/// Cache of meal listings keyed by category name
pub struct MealsStore {
    api: Arc<dyn RecipeApi>,
    state: Mutex<MealsState>,
}

impl MealsStore {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(MealsState::default()),
        }
    }

    /// Fetches the meals of `category` and stores them under that exact name
    ///
    /// Does nothing for an empty category. A failure records the error and
    /// leaves any cached listing in place.
    pub async fn fetch_meals(&self, category: &str) {
        if category.is_empty() {
            return;
        }

        let ticket = lock(&self.state).requests.begin(category);
        debug!("Fetching meals for category {:?}", category);

        let result = self.api.meals_by_category(category).await;

        let mut state = lock(&self.state);
        match result {
            Ok(meals) => {
                if state.requests.succeed(&ticket) {
                    state.by_category.insert(category.to_string(), meals);
                } else {
                    debug!("Discarding superseded meals response for {:?}", category);
                }
            }
            Err(e) => {
                warn!("Failed to load meals for {:?}: {}", category, e);
                state.requests.fail(&ticket, e.to_string());
            }
        }
    }

    /// Returns the cached meals of `category`, or an empty list
    pub fn meals(&self, category: &str) -> Vec<Meal> {
        lock(&self.state)
            .by_category
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether a listing has been stored for `category`
    pub fn contains(&self, category: &str) -> bool {
        lock(&self.state).by_category.contains_key(category)
    }

    /// True while any category fetch is in flight
    pub fn loading(&self) -> bool {
        lock(&self.state).requests.is_loading()
    }

    /// Message of the latest failed fetch
    pub fn error(&self) -> Option<String> {
        lock(&self.state).requests.last_error()
    }

    /// Request status of one category
    pub fn status(&self, category: &str) -> RequestStatus {
        lock(&self.state).requests.status(category)
    }
}
