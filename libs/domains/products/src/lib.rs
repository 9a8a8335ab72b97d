//! Products Domain
//!
//! Product catalogue stored in MongoDB. Each product carries a cost price
//! and a profit margin; the selling price is derived on every read and never
//! stored.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Paging, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Stored documents, API records, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("store");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//! let router = handlers::router(ProductService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, DEFAULT_PROFIT_MARGIN, Product, ProductDocument, ProductFilter, ProductPage,
    ProductQuery, ProductSortField, UpdateProduct,
};
pub use self::mongodb::{MongoProductRepository, PRODUCTS_COLLECTION};
pub use repository::ProductRepository;
pub use service::ProductService;
