//! Categories store
//!
//! Holds the full category list. Every fetch goes to the network; the list is
//! small and only the latest issued fetch may replace it.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::status::{lock, RequestStatus, RequestTracker};
use crate::data::{Category, RecipeApi};

/// Tracker key of the single categories request
const CATEGORIES_KEY: &str = "categories";

#[derive(Debug, Default)]
struct CategoriesState {
    categories: Vec<Category>,
    requests: RequestTracker,
}

/// Cache of the category list
pub struct CategoriesStore {
    api: Arc<dyn RecipeApi>,
    state: Mutex<CategoriesState>,
}

impl CategoriesStore {
    /// Creates an empty store backed by `api`
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(CategoriesState::default()),
        }
    }

    /// Fetches the category list and replaces the stored one
    ///
    /// On failure the error is recorded and any previously fetched list is
    /// kept.
    pub async fn fetch_categories(&self) {
        let ticket = lock(&self.state).requests.begin(CATEGORIES_KEY);
        debug!("Fetching categories");

        let result = self.api.categories().await;

        let mut state = lock(&self.state);
        match result {
            Ok(categories) => {
                if state.requests.succeed(&ticket) {
                    state.categories = categories;
                } else {
                    debug!("Discarding superseded categories response");
                }
            }
            Err(e) => {
                warn!("Failed to load categories: {}", e);
                state.requests.fail(&ticket, e.to_string());
            }
        }
    }

    /// Returns the stored category list
    pub fn categories(&self) -> Vec<Category> {
        lock(&self.state).categories.clone()
    }

    /// Looks a category up by its exact display name
    pub fn category(&self, name: &str) -> Option<Category> {
        lock(&self.state)
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Resolves a category by name, fetching the list if it is empty
    ///
    /// Falls back to [`Category::placeholder`] when the name is unknown or the
    /// list cannot be loaded.
    pub async fn find_category(&self, name: &str) -> Category {
        if lock(&self.state).categories.is_empty() {
            self.fetch_categories().await;
        }
        self.category(name)
            .unwrap_or_else(|| Category::placeholder(name))
    }

    /// True while a fetch is in flight
    pub fn loading(&self) -> bool {
        lock(&self.state).requests.is_loading()
    }

    /// Message of the latest failed fetch
    pub fn error(&self) -> Option<String> {
        lock(&self.state).requests.last_error()
    }

    /// Request status of the category list
    pub fn status(&self) -> RequestStatus {
        lock(&self.state).requests.status(CATEGORIES_KEY)
    }
}
