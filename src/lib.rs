//! MealDB client library
//!
//! Caching stores over TheMealDB's recipe API, the HTTP client behind them,
//! and the command-line layer that drives them.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod output;
