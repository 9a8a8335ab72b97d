//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductPage, ProductQuery, UpdateProduct};
use crate::repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Filtered, sorted page plus the total number of matches
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<ProductPage> {
        let (filter, page) = query.into_parts()?;

        let total = self.repository.count(filter.clone()).await?;
        let products = self.repository.list(filter, page.clone()).await?;

        Ok(ProductPage {
            total,
            page: page.page(),
            limit: page.limit(),
            products,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        self.repository.update(id, input).await
    }

    /// `false` when the product did not exist
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<bool> {
        self.repository.delete(id).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
