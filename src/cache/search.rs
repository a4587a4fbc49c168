//! Search store
//!
//! Runs free-text meal searches and remembers every result set under its
//! normalized query. The visible result set always belongs to the most
//! recently issued search; a slower, older response only fills the cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::status::lock;
use crate::data::{Meal, RecipeApi};

/// Normalizes a query for use as a cache key: trimmed and lower-cased
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

#[derive(Debug, Default)]
struct SearchState {
    search_query: String,
    meals: Vec<Meal>,
    loading: bool,
    searched: bool,
    error: Option<String>,
    cache: HashMap<String, Vec<Meal>>,
    /// Bumped by every call that changes what should be visible
    generation: u64,
}

/// Cache of search results keyed by normalized query
pub struct SearchStore {
    api: Arc<dyn RecipeApi>,
    state: Mutex<SearchState>,
}

impl SearchStore {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Searches meals by name
    ///
    /// An empty normalized query clears the results without a request. A
    /// query seen before is answered from the cache. On failure the visible
    /// results are left untouched and the error is recorded.
    pub async fn search_meals(&self, query: &str) {
        let normalized = normalize_query(query);

        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;

            if normalized.is_empty() {
                state.meals.clear();
                state.searched = false;
                state.loading = false;
                return;
            }

            if let Some(cached) = state.cache.get(&normalized).cloned() {
                debug!("Search {:?} served from cache", normalized);
                state.meals = cached;
                state.searched = true;
                state.loading = false;
                state.error = None;
                return;
            }

            state.loading = true;
            state.searched = true;
            state.error = None;
            state.generation
        };
        debug!("Searching meals for {:?}", normalized);

        let result = self.api.search_meals(&normalized).await;

        let mut state = lock(&self.state);
        let current = state.generation == generation;
        match result {
            Ok(meals) => {
                if current {
                    state.meals = meals.clone();
                    state.loading = false;
                } else {
                    debug!("Search {:?} superseded, caching only", normalized);
                }
                state.cache.insert(normalized, meals);
            }
            Err(e) => {
                warn!("Error searching meals for {:?}: {}", normalized, e);
                if current {
                    state.loading = false;
                    state.error = Some(e.to_string());
                }
            }
        }
    }

    /// Resets the visible search state, keeping cached results
    pub fn clear_search(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.search_query.clear();
        state.meals.clear();
        state.searched = false;
        state.loading = false;
    }

    /// Records the raw text the user typed
    pub fn set_search_query(&self, query: &str) {
        lock(&self.state).search_query = query.to_string();
    }

    pub fn search_query(&self) -> String {
        lock(&self.state).search_query.clone()
    }

    /// Results of the latest search
    pub fn meals(&self) -> Vec<Meal> {
        lock(&self.state).meals.clone()
    }

    /// True while the latest search waits for the network
    pub fn loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Whether a non-empty search has been issued since the last reset
    pub fn searched(&self) -> bool {
        lock(&self.state).searched
    }

    /// Message of the latest failed search
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    /// Cached results for `query`, after normalization
    pub fn cached(&self, query: &str) -> Option<Vec<Meal>> {
        lock(&self.state).cache.get(&normalize_query(query)).cloned()
    }
}
