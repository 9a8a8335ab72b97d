//! Suppliers Domain
//!
//! Suppliers referenced by products through `supplier_id`. Same layering as
//! the products domain: handlers, service, repository trait with a MongoDB
//! implementation, models.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{SupplierError, SupplierResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateSupplier, Supplier, SupplierDocument, SupplierFilter, SupplierPage, SupplierQuery,
    SupplierSortField, UpdateSupplier,
};
pub use self::mongodb::{MongoSupplierRepository, SUPPLIERS_COLLECTION};
pub use repository::SupplierRepository;
pub use service::SupplierService;
