// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 8vents Points API Server
//!
//! Awards points for event participation, donations and community requests,
//! tracks daily streaks and levels, and recommends volunteers to each other.

use eightvents_points::{
    config::{Config, StoreBackend},
    db::{FirestoreStore, JsonFileStore, MemoryStore, PointsStore},
    services::{MatchingService, PointsService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, backend = ?config.store_backend, "Starting 8vents Points API");

    let store: Arc<dyn PointsStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; points are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::JsonFile => {
            tracing::info!(path = %config.points_file.display(), "Using JSON points file");
            Arc::new(JsonFileStore::new(&config.points_file))
        }
        StoreBackend::Firestore => {
            let project_id = config
                .gcp_project_id
                .as_deref()
                .ok_or("GCP_PROJECT_ID is required for the Firestore backend")?;
            Arc::new(FirestoreStore::new(project_id).await?)
        }
    };

    if config.admin_api_key.is_none() {
        tracing::warn!("ADMIN_API_KEY not set; admin routes are unauthenticated");
    }

    // Build shared state
    let state = Arc::new(AppState {
        points: PointsService::new(store.clone(), config.donation_points_per_unit),
        matching: MatchingService::new(store),
        config: config.clone(),
    });

    // Build router
    let app = eightvents_points::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eightvents_points=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
