//! Command-line interface parsing for the MealDB client
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`]: the HTTP client configuration plus the
//! command to run.

use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::data::client::normalize_base_url;
use crate::data::{ClientConfig, DEFAULT_BASE_URL};

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// The base URL is blank
    #[error("Invalid base URL: must not be empty")]
    EmptyBaseUrl,

    /// A timeout of zero seconds was requested
    #[error("Invalid timeout: must be at least 1 second")]
    ZeroTimeout,

    /// A required positional value is blank
    #[error("Invalid {0}: must not be empty")]
    EmptyArgument(&'static str),
}

/// MealDB CLI - Browse recipe categories, meals and searches
#[derive(Parser, Debug)]
#[command(name = "mealdb")]
#[command(about = "Browse TheMealDB recipes: categories, meals, details and search")]
#[command(version)]
pub struct Cli {
    /// Root of the recipe API
    #[arg(long, global = true, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds (transport default when omitted)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to fetch
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all meal categories
    Categories,

    /// Show one category by name
    Category {
        /// Category name, e.g. "Seafood"
        name: String,
    },

    /// List the meals of one or more categories
    ///
    /// Examples:
    ///   mealdb meals Seafood
    ///   mealdb meals Beef Chicken
    Meals {
        /// Category names (case-sensitive)
        #[arg(required = true)]
        categories: Vec<String>,
    },

    /// Show a meal's full recipe by id
    Meal {
        /// Meal id, e.g. 52977
        id: String,
    },

    /// Search meals by name
    Search {
        /// Search terms; joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show a random meal
    Random,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// HTTP client settings
    pub client: ClientConfig,
    /// Whether to print JSON
    pub json: bool,
    /// Command to run
    pub command: Command,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if a flag or argument is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base_url = normalize_base_url(&cli.base_url);
        if base_url.is_empty() {
            return Err(CliError::EmptyBaseUrl);
        }

        let timeout = match cli.timeout {
            Some(0) => return Err(CliError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        match &cli.command {
            Command::Category { name } if name.is_empty() => {
                return Err(CliError::EmptyArgument("category name"))
            }
            Command::Meals { categories } if categories.iter().any(String::is_empty) => {
                return Err(CliError::EmptyArgument("category name"))
            }
            Command::Meal { id } if id.trim().is_empty() => {
                return Err(CliError::EmptyArgument("meal id"))
            }
            _ => {}
        }

        Ok(StartupConfig {
            client: ClientConfig {
                base_url,
                timeout,
                ..ClientConfig::default()
            },
            json: cli.json,
            command: cli.command.clone(),
        })
    }
}
