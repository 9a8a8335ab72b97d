use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{SupplierError, SupplierResult};
use crate::models::{CreateSupplier, Supplier, SupplierPage, SupplierQuery, UpdateSupplier};
use crate::repository::SupplierRepository;

pub struct SupplierService<R: SupplierRepository> {
    repository: Arc<R>,
}

impl<R: SupplierRepository> SupplierService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(supplier_name = %input.name))]
    pub async fn create_supplier(&self, input: CreateSupplier) -> SupplierResult<Supplier> {
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: Uuid) -> SupplierResult<Supplier> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SupplierError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self, query: SupplierQuery) -> SupplierResult<SupplierPage> {
        let (filter, page) = query.into_parts()?;

        let total = self.repository.count(filter.clone()).await?;
        let suppliers = self.repository.list(filter, page.clone()).await?;

        Ok(SupplierPage {
            total,
            page: page.page(),
            limit: page.limit(),
            suppliers,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        id: Uuid,
        input: UpdateSupplier,
    ) -> SupplierResult<Supplier> {
        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: Uuid) -> SupplierResult<bool> {
        self.repository.delete(id).await
    }
}

impl<R: SupplierRepository> Clone for SupplierService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SupplierDocument;
    use crate::repository::MockSupplierRepository;

    #[tokio::test]
    async fn test_get_supplier_not_found() {
        let mut mock_repo = MockSupplierRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = SupplierService::new(mock_repo);
        let result = service.get_supplier(Uuid::now_v7()).await;

        assert!(matches!(result, Err(SupplierError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_suppliers_reports_total_and_window() {
        let supplier: Supplier = SupplierDocument::new(CreateSupplier {
            name: "Acme".to_string(),
            contact_email: None,
            phone: None,
            address: None,
        })
        .into();

        let mut mock_repo = MockSupplierRepository::new();
        mock_repo.expect_count().times(1).returning(|_| Ok(7));
        mock_repo
            .expect_list()
            .withf(|_, page| page.page() == 3 && page.limit() == 2 && page.skip() == 4)
            .returning(move |_, _| Ok(vec![supplier.clone()]));

        let service = SupplierService::new(mock_repo);
        let page = service
            .list_suppliers(SupplierQuery {
                page: 3,
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 7);
        assert_eq!(page.suppliers.len(), 1);
    }

    #[tokio::test]
    async fn test_list_suppliers_rejects_limit_over_max() {
        let service = SupplierService::new(MockSupplierRepository::new());
        let result = service
            .list_suppliers(SupplierQuery {
                limit: 500,
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(SupplierError::Validation(_))));
    }
}
