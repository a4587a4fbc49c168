//! TheMealDB API client
//!
//! This module provides the [`RecipeApi`] seam the caching stores depend on,
//! and [`RecipeClient`], its reqwest-backed implementation.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::{Category, Meal, MealDetail};

/// Base URL for TheMealDB's public v1 API
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// User agent sent with every request
const USER_AGENT: &str = concat!("mealdb/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when talking to the recipe API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed; the message carries the whole cause chain
    #[error("HTTP request failed: {}", format_reqwest_error(.0))]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(StatusCode),

    /// Response body was not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read-only operations of the remote recipe database
///
/// Missing or malformed list fields are reported as empty lists, and a lookup
/// that matches nothing is `Ok(None)`, never an error.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Lists all meal categories
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Lists the meals of one category
    async fn meals_by_category(&self, category: &str) -> Result<Vec<Meal>, ApiError>;

    /// Looks up one meal by id
    async fn meal_by_id(&self, id: &str) -> Result<Option<MealDetail>, ApiError>;

    /// Free-text search on meal names
    async fn search_meals(&self, query: &str) -> Result<Vec<Meal>, ApiError>;

    /// Picks one meal at random
    async fn random_meal(&self) -> Result<Option<MealDetail>, ApiError>;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Trims whitespace and trailing slashes off a base URL
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Client for fetching recipe data from TheMealDB
#[derive(Debug, Clone)]
pub struct RecipeClient {
    client: Client,
    base_url: String,
}

impl RecipeClient {
    /// Creates a new RecipeClient from the given configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base_url(&config.base_url),
        })
    }

    /// Creates a new RecipeClient with a custom HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Builds the URL of an endpoint, percent-encoding any query parameter
    ///
    /// # Arguments
    /// * `endpoint` - Script name under the API root (e.g. "filter.php")
    /// * `query` - Optional single query parameter
    pub fn endpoint_url(&self, endpoint: &str, query: Option<(&str, &str)>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, endpoint))?;
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Performs a GET and returns the decoded JSON body
    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(ApiError::from)
            .inspect_err(|e| warn!("Request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} returned {}", url, status);
            return Err(ApiError::Status(status));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RecipeApi for RecipeClient {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint_url("categories.php", None)?;
        let body = self.get_json(url).await?;
        Ok(parse_list(body, "categories"))
    }

    async fn meals_by_category(&self, category: &str) -> Result<Vec<Meal>, ApiError> {
        let url = self.endpoint_url("filter.php", Some(("c", category)))?;
        let body = self.get_json(url).await?;
        Ok(parse_list(body, "meals"))
    }

    async fn meal_by_id(&self, id: &str) -> Result<Option<MealDetail>, ApiError> {
        let url = self.endpoint_url("lookup.php", Some(("i", id)))?;
        let body = self.get_json(url).await?;
        Ok(parse_list(body, "meals").into_iter().next())
    }

    async fn search_meals(&self, query: &str) -> Result<Vec<Meal>, ApiError> {
        let url = self.endpoint_url("search.php", Some(("s", query)))?;
        let body = self.get_json(url).await?;
        Ok(parse_list(body, "meals"))
    }

    async fn random_meal(&self) -> Result<Option<MealDetail>, ApiError> {
        let url = self.endpoint_url("random.php", None)?;
        let body = self.get_json(url).await?;
        Ok(parse_list(body, "meals").into_iter().next())
    }
}

/// Pulls a list out of a response body
///
/// A missing, `null` or non-array field yields an empty list. Elements that do
/// not match `T` are skipped.
pub(crate) fn parse_list<T: DeserializeOwned>(mut body: Value, field: &str) -> Vec<T> {
    let items = match body.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            warn!("Expected `{}` to be an array, got {}", field, other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping malformed `{}` entry: {}", field, e);
                None
            }
        })
        .collect()
}

/// Joins a reqwest error with its causes, skipping repeated text
///
/// reqwest's own message only names the URL; the reason (refused
/// connection, DNS or TLS failure, timeout) sits further down the chain.
fn format_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}
