//! API routes module
//!
//! Wires the domain crates to HTTP routes. Everything returned by [`routes`]
//! is nested under `/api` by `axum_helpers::create_router`.

pub mod health;
pub mod products;
pub mod suppliers;
pub mod users;

use axum::{Json, Router, routing::get};
use mongodb::Database;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

/// All `/api` routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/suppliers", suppliers::router(state))
        .nest("/users", users::router(state))
        .nest("/purchases", users::purchases_router(state))
        .merge(health::router(state.clone()))
}

/// `GET /` outside the `/api` prefix
pub fn root_router() -> Router {
    Router::new().route("/", get(welcome))
}

async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Store API!",
    })
}

/// Create every collection index the domains rely on
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    products::init_indexes(db).await?;
    suppliers::init_indexes(db).await?;
    users::init_indexes(db).await?;
    Ok(())
}
