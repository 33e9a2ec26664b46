//! mealflow — food-ordering backend
//!
//! HTTP/JSON service that:
//! - Serves the product catalog (browse, search, popular picks)
//! - Manages per-user carts and favorites (session authenticated)
//! - Converts carts into immutable orders with unique pickup numbers
//! - Records synchronous payment confirmations against orders

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealflow=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting mealflow (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("mealflow listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
