//! Users and Purchases API routes
//!
//! Both routers share one repository type; each gets its own service handle.

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(UserService::new(MongoUserRepository::new(&state.db)))
}

pub fn purchases_router(state: &AppState) -> Router {
    handlers::purchases_router(UserService::new(MongoUserRepository::new(&state.db)))
}

/// Unique index on `users.email`
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).init_indexes().await?;
    Ok(())
}
