//! MealDB CLI - Browse TheMealDB recipes from the terminal
//!
//! Fetches categories, meal listings, full recipes and search results from
//! TheMealDB and prints them as text or JSON.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use mealdb::app::App;
use mealdb::cli::{Cli, StartupConfig};
use mealdb::data::RecipeClient;

/// Sets up stderr logging, `warn` unless `RUST_LOG` says otherwise
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    // One client, one set of stores for the whole process
    let client = RecipeClient::new(&config.client)?;
    let app = App::new(Arc::new(client));

    match app.run(&config.command).await {
        Ok(output) => {
            if config.json {
                println!("{}", output.to_json()?);
            } else {
                print!("{}", output.render_text());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            debug!("{:?} failed: {:?}", config.command, e);
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
