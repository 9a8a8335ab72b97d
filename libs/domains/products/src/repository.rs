use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};

/// Persistence interface for products
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product and return it with its generated id
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// One window of products matching `filter`, sorted before skip/limit
    async fn list(&self, filter: ProductFilter, page: PageRequest) -> ProductResult<Vec<Product>>;

    /// Number of products matching `filter`, ignoring any window
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Merge the supplied fields; `NotFound` when the id is absent
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}
