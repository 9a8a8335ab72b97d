//! Products API routes

use axum::Router;
use domain_products::{MongoProductRepository, ProductService, handlers};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    handlers::router(ProductService::new(repository))
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoProductRepository::new(db).init_indexes().await?;
    Ok(())
}
