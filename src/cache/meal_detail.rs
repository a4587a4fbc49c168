//! Meal-detail store
//!
//! Caches lookups by meal id, including lookups that found nothing. Once an
//! id has an entry it is never requested again; a failed lookup leaves no
//! entry, so the next call retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::status::{lock, RequestStatus, RequestTracker};
use crate::data::{MealDetail, RecipeApi};

/// Key of random-meal requests within their own tracker
const RANDOM_KEY: &str = "random";

/// Result of reading one id from the detail cache
#[derive(Debug, Clone, PartialEq)]
pub enum MealLookup {
    /// The id has never been looked up successfully
    NotFetched,
    /// The lookup succeeded but upstream has no such meal
    NotFound,
    /// The meal record
    Found(MealDetail),
}

impl MealLookup {
    /// Returns the record, if one was found
    pub fn found(self) -> Option<MealDetail> {
        match self {
            MealLookup::Found(detail) => Some(detail),
            _ => None,
        }
    }

    /// Whether a lookup for this id has completed
    pub fn is_fetched(&self) -> bool {
        !matches!(self, MealLookup::NotFetched)
    }
}

#[derive(Debug, Default)]
struct MealDetailState {
    /// `None` marks an id that upstream does not know
    by_id: HashMap<String, Option<MealDetail>>,
    /// Lookups by id
    requests: RequestTracker,
    /// Random-meal requests, kept apart so no meal id can share their status
    random: RequestTracker,
    /// Latest current failure of either kind, cleared when any request starts
    last_error: Option<String>,
}

/// Cache of full meal records keyed by meal id
pub struct MealDetailStore {
    api: Arc<dyn RecipeApi>,
    state: Mutex<MealDetailState>,
}

impl MealDetailStore {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(MealDetailState::default()),
        }
    }

    /// Looks up `meal_id` unless the cache already has an entry for it
    ///
    /// Does nothing for an empty id. A lookup that finds nothing is cached as
    /// [`MealLookup::NotFound`].
    pub async fn fetch_meal_detail(&self, meal_id: &str) {
        if meal_id.is_empty() {
            return;
        }

        let ticket = {
            let mut state = lock(&self.state);
            if state.by_id.contains_key(meal_id) {
                debug!("Meal {} served from cache", meal_id);
                return;
            }
            state.last_error = None;
            state.requests.begin(meal_id)
        };
        debug!("Fetching meal {}", meal_id);

        let result = self.api.meal_by_id(meal_id).await;

        let mut state = lock(&self.state);
        match result {
            Ok(detail) => {
                if detail.is_none() {
                    debug!("Meal {} not found upstream", meal_id);
                }
                if state.requests.succeed(&ticket) {
                    state.by_id.insert(meal_id.to_string(), detail);
                } else {
                    // Same id, same immutable record: keep whichever landed.
                    state.by_id.entry(meal_id.to_string()).or_insert(detail);
                }
            }
            Err(e) => {
                warn!("Failed to load meal {}: {}", meal_id, e);
                if state.requests.fail(&ticket, e.to_string()) {
                    state.last_error = Some(e.to_string());
                }
            }
        }
    }

    /// Fetches a random meal and caches it under its id
    ///
    /// Returns the meal, or `None` when upstream returned nothing or the
    /// request failed (the error is recorded).
    pub async fn fetch_random_meal(&self) -> Option<MealDetail> {
        let ticket = {
            let mut state = lock(&self.state);
            state.last_error = None;
            state.random.begin(RANDOM_KEY)
        };
        debug!("Fetching random meal");

        let result = self.api.random_meal().await;

        let mut state = lock(&self.state);
        match result {
            Ok(detail) => {
                state.random.succeed(&ticket);
                if let Some(detail) = &detail {
                    state
                        .by_id
                        .insert(detail.id.clone(), Some(detail.clone()));
                }
                detail
            }
            Err(e) => {
                warn!("Failed to load random meal: {}", e);
                if state.random.fail(&ticket, e.to_string()) {
                    state.last_error = Some(e.to_string());
                }
                None
            }
        }
    }

    /// Reads the cache entry for `meal_id` without fetching
    pub fn meal(&self, meal_id: &str) -> MealLookup {
        match lock(&self.state).by_id.get(meal_id) {
            None => MealLookup::NotFetched,
            Some(None) => MealLookup::NotFound,
            Some(Some(detail)) => MealLookup::Found(detail.clone()),
        }
    }

    /// True while any lookup is in flight
    pub fn loading(&self) -> bool {
        let state = lock(&self.state);
        state.requests.is_loading() || state.random.is_loading()
    }

    /// Message of the latest failed lookup
    pub fn error(&self) -> Option<String> {
        lock(&self.state).last_error.clone()
    }

    /// Request status of one meal id
    pub fn status(&self, meal_id: &str) -> RequestStatus {
        lock(&self.state).requests.status(meal_id)
    }

    /// Request status of random-meal fetches
    pub fn random_status(&self) -> RequestStatus {
        lock(&self.state).random.status(RANDOM_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fake::{detail, FakeApi, Reply};
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_found_meal_is_cached() {
        let api = Arc::new(FakeApi::new());
        api.reply("lookup:52977", Reply::Detail(Some(detail("52977", "Corba"))));
        let store = MealDetailStore::new(api.clone());

        store.fetch_meal_detail("52977").await;

        assert_eq!(store.meal("52977"), MealLookup::Found(detail("52977", "Corba")));
        assert!(!store.loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_repeat_lookup_issues_no_request() {
        let api = Arc::new(FakeApi::new());
        api.reply("lookup:52977", Reply::Detail(Some(detail("52977", "Corba"))));
        let store = MealDetailStore::new(api.clone());

        store.fetch_meal_detail("52977").await;
        store.fetch_meal_detail("52977").await;
        store.fetch_meal_detail("52977").await;

        assert_eq!(api.count("lookup:52977"), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_distinct_from_never_fetched() {
        let api = Arc::new(FakeApi::new());
        api.reply("lookup:52977", Reply::Detail(None));
        let store = MealDetailStore::new(api.clone());

        assert_eq!(store.meal("52977"), MealLookup::NotFetched);

        store.fetch_meal_detail("52977").await;
        assert_eq!(store.meal("52977"), MealLookup::NotFound);
        assert!(store.meal("52977").is_fetched());

        store.fetch_meal_detail("52977").await;
        assert_eq!(api.count("lookup:52977"), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_no_entry_and_retries() {
        let api = Arc::new(FakeApi::new());
        api.reply("lookup:1", Reply::Fail(StatusCode::INTERNAL_SERVER_ERROR));
        let store = MealDetailStore::new(api.clone());

        store.fetch_meal_detail("1").await;
        assert_eq!(store.meal("1"), MealLookup::NotFetched);
        assert!(store.error().is_some());
        assert!(!store.loading());

        api.reply("lookup:1", Reply::Detail(Some(detail("1", "Retry"))));
        store.fetch_meal_detail("1").await;

        assert_eq!(api.count("lookup:1"), 2);
        assert_eq!(store.meal("1").found().map(|d| d.name), Some("Retry".to_string()));
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_empty_id_is_a_no_op() {
        let api = Arc::new(FakeApi::new());
        let store = MealDetailStore::new(api.clone());

        store.fetch_meal_detail("").await;

        assert!(api.calls().is_empty());
        assert_eq!(store.meal(""), MealLookup::NotFetched);
    }

    #[tokio::test]
    async fn test_overlapping_lookups_of_same_id_both_fetch() {
        let api = Arc::new(FakeApi::new());
        api.reply("lookup:7", Reply::Detail(Some(detail("7", "Stew"))));
        let release = api.hold("lookup:7");
        let store = MealDetailStore::new(api.clone());

        let first = store.fetch_meal_detail("7");
        let second = async {
            store.fetch_meal_detail("7").await;
            release.send(()).unwrap();
        };
        tokio::join!(first, second);

        assert_eq!(api.count("lookup:7"), 2);
        assert_eq!(store.meal("7").found().map(|d| d.id), Some("7".to_string()));
        assert!(!store.loading());

        store.fetch_meal_detail("7").await;
        assert_eq!(api.count("lookup:7"), 2);
    }

    #[tokio::test]
    async fn test_random_meal_seeds_detail_cache() {
        let api = Arc::new(FakeApi::new());
        api.reply("random", Reply::Detail(Some(detail("52772", "Teriyaki Chicken"))));
        let store = MealDetailStore::new(api.clone());

        let random = store.fetch_random_meal().await;
        assert_eq!(random.map(|d| d.id), Some("52772".to_string()));

        store.fetch_meal_detail("52772").await;
        assert_eq!(api.count("lookup:52772"), 0);
        assert!(store.meal("52772").found().is_some());
    }

    #[tokio::test]
    async fn test_random_meal_is_never_deduplicated() {
        let api = Arc::new(FakeApi::new());
        let store = MealDetailStore::new(api.clone());

        assert!(store.fetch_random_meal().await.is_none());
        assert!(store.fetch_random_meal().await.is_none());

        assert_eq!(api.count("random"), 2);
    }

    #[tokio::test]
    async fn test_random_meal_failure_records_error() {
        let api = Arc::new(FakeApi::new());
        api.reply("random", Reply::Fail(StatusCode::TOO_MANY_REQUESTS));
        let store = MealDetailStore::new(api.clone());

        assert!(store.fetch_random_meal().await.is_none());
        assert!(store.error().expect("error recorded").contains("429"));
    }

    #[tokio::test]
    async fn test_random_meal_status_is_separate_from_ids() {
        let api = Arc::new(FakeApi::new());
        api.reply("random", Reply::Detail(Some(detail("52772", "Teriyaki Chicken"))));
        let release = api.hold("random");
        let store = MealDetailStore::new(api.clone());

        let random = store.fetch_random_meal();
        let lookup = async {
            store.fetch_meal_detail("random").await;
            store.fetch_meal_detail("<random>").await;
            let snapshot = (
                store.status("random").loading,
                store.status("<random>").loading,
                store.random_status().loading,
                store.loading(),
            );
            release.send(()).unwrap();
            snapshot
        };
        let (found, (id_loading, sentinel_loading, random_loading, any_loading)) =
            tokio::join!(random, lookup);

        assert!(!id_loading);
        assert!(!sentinel_loading);
        assert!(random_loading, "random fetch is still pending");
        assert!(any_loading);

        assert_eq!(found.map(|d| d.id), Some("52772".to_string()));
        assert!(store.random_status().fetched_at.is_some());
        assert!(!store.loading());
        assert_eq!(store.meal("random"), MealLookup::NotFound);
        assert_eq!(store.meal("<random>"), MealLookup::NotFound);
    }

    #[tokio::test]
    async fn test_random_failure_does_not_mark_any_id() {
        let api = Arc::new(FakeApi::new());
        api.reply("random", Reply::Fail(StatusCode::BAD_GATEWAY));
        let store = MealDetailStore::new(api.clone());

        store.fetch_random_meal().await;

        assert!(store.random_status().error.is_some());
        assert!(store.status("random").error.is_none());
        assert!(store.error().is_some());

        store.fetch_meal_detail("52977").await;
        assert!(store.error().is_none(), "a new request clears the store error");
    }
}
