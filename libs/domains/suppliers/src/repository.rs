use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::error::SupplierResult;
use crate::models::{CreateSupplier, Supplier, SupplierFilter, UpdateSupplier};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn create(&self, input: CreateSupplier) -> SupplierResult<Supplier>;

    async fn get_by_id(&self, id: Uuid) -> SupplierResult<Option<Supplier>>;

    async fn list(&self, filter: SupplierFilter, page: PageRequest)
    -> SupplierResult<Vec<Supplier>>;

    async fn count(&self, filter: SupplierFilter) -> SupplierResult<u64>;

    /// `NotFound` when the id is absent
    async fn update(&self, id: Uuid, input: UpdateSupplier) -> SupplierResult<Supplier>;

    async fn delete(&self, id: Uuid) -> SupplierResult<bool>;
}
