//! Suppliers API routes

use axum::Router;
use domain_suppliers::{MongoSupplierRepository, SupplierService, handlers};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoSupplierRepository::new(&state.db);
    handlers::router(SupplierService::new(repository))
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoSupplierRepository::new(db).init_indexes().await?;
    Ok(())
}
