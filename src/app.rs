//! Application state for the MealDB client
//!
//! [`App`] owns one instance of each store, all sharing a single API client.
//! It is constructed once at startup and handed to whatever drives it; the
//! binary runs one [`Command`] against it.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tracing::debug;

use crate::cache::{
    normalize_query, CategoriesStore, MealDetailStore, MealLookup, MealsStore, SearchStore,
};
use crate::cli::Command;
use crate::data::RecipeApi;
use crate::output::Output;

/// Errors surfaced to the user after running a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    /// A store recorded a failed request
    #[error("{0}")]
    Fetch(String),

    /// The lookup succeeded but no meal has this id
    #[error("No meal found with id {0}")]
    MealNotFound(String),

    /// The random endpoint returned no meal
    #[error("No random meal returned")]
    NoRandomMeal,
}

/// The four caching stores of the application
pub struct App {
    pub categories: CategoriesStore,
    pub meals: MealsStore,
    pub meal_detail: MealDetailStore,
    pub search: SearchStore,
}

impl App {
    /// Creates the stores, all backed by `api`
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            categories: CategoriesStore::new(api.clone()),
            meals: MealsStore::new(api.clone()),
            meal_detail: MealDetailStore::new(api.clone()),
            search: SearchStore::new(api),
        }
    }

    /// Runs one command and returns what to display
    pub async fn run(&self, command: &Command) -> Result<Output, AppError> {
        debug!("Running {:?}", command);
        match command {
            Command::Categories => {
                self.categories.fetch_categories().await;
                if let Some(error) = self.categories.error() {
                    return Err(AppError::Fetch(error));
                }
                Ok(Output::Categories(self.categories.categories()))
            }
            Command::Category { name } => {
                Ok(Output::Category(self.categories.find_category(name).await))
            }
            Command::Meals { categories } => self.load_meals(categories).await,
            Command::Meal { id } => {
                self.meal_detail.fetch_meal_detail(id).await;
                match self.meal_detail.meal(id) {
                    MealLookup::Found(detail) => Ok(Output::Meal(detail)),
                    MealLookup::NotFound => Err(AppError::MealNotFound(id.clone())),
                    MealLookup::NotFetched => Err(AppError::Fetch(
                        self.meal_detail
                            .status(id)
                            .error
                            .unwrap_or_else(|| format!("Meal {} could not be loaded", id)),
                    )),
                }
            }
            Command::Search { query } => {
                let query = query.join(" ");
                self.search.set_search_query(&query);
                self.search.search_meals(&query).await;
                if let Some(error) = self.search.error() {
                    return Err(AppError::Fetch(error));
                }
                Ok(Output::Search {
                    query: normalize_query(&query),
                    searched: self.search.searched(),
                    meals: self.search.meals(),
                })
            }
            Command::Random => match self.meal_detail.fetch_random_meal().await {
                Some(detail) => Ok(Output::Meal(detail)),
                None => Err(self
                    .meal_detail
                    .error()
                    .map(AppError::Fetch)
                    .unwrap_or(AppError::NoRandomMeal)),
            },
        }
    }

    /// Fetches several categories concurrently through the meals store
    async fn load_meals(&self, categories: &[String]) -> Result<Output, AppError> {
        join_all(categories.iter().map(|c| self.meals.fetch_meals(c))).await;

        let mut listings = Vec::with_capacity(categories.len());
        for category in categories {
            if let Some(error) = self.meals.status(category).error {
                return Err(AppError::Fetch(format!("{}: {}", category, error)));
            }
            listings.push((category.clone(), self.meals.meals(category)));
        }
        Ok(Output::Meals(listings))
    }
}
