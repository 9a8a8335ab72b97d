use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{CreateUser, PurchasedProductsPage, UpdateUser, User, UserFilter};

/// Persistence interface for users and their purchase sets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `DuplicateEmail` when the unique email index rejects the insert
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;

    async fn list(&self, filter: UserFilter, page: PageRequest) -> UserResult<Vec<User>>;

    async fn count(&self, filter: UserFilter) -> UserResult<u64>;

    /// `NotFound` when the id is absent
    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Add `product_id` to the user's purchase set; `false` when the user does not exist
    async fn add_purchase(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool>;

    /// Remove `product_id` from the user's purchase set; `false` when the user does not exist
    async fn remove_purchase(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool>;

    /// Join the user's purchase set against the products collection
    async fn purchased_products(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> UserResult<PurchasedProductsPage>;
}
