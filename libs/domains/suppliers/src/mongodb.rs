//! MongoDB implementation of SupplierRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use database::mongodb::uuid_bson;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use pagination::PageRequest;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{SupplierError, SupplierResult};
use crate::models::{CreateSupplier, Supplier, SupplierDocument, SupplierFilter, UpdateSupplier};
use crate::repository::SupplierRepository;

pub const SUPPLIERS_COLLECTION: &str = "suppliers";

pub struct MongoSupplierRepository {
    collection: Collection<SupplierDocument>,
}

impl MongoSupplierRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<SupplierDocument>(SUPPLIERS_COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> SupplierResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().name("idx_name".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Supplier indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_bson(id) }
    }

    fn build_filter(filter: &SupplierFilter) -> Document {
        let mut doc = doc! {};
        if let Some(ref name) = filter.name {
            doc.insert("name", name);
        }
        doc
    }
}

#[async_trait]
impl SupplierRepository for MongoSupplierRepository {
    #[instrument(skip(self, input), fields(supplier_name = %input.name))]
    async fn create(&self, input: CreateSupplier) -> SupplierResult<Supplier> {
        let document = SupplierDocument::new(input);
        self.collection.insert_one(&document).await?;

        tracing::info!(supplier_id = %document.id, "Supplier created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> SupplierResult<Option<Supplier>> {
        let document = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(document.map(Supplier::from))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: SupplierFilter,
        page: PageRequest,
    ) -> SupplierResult<Vec<Supplier>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page.find_options())
            .await?;
        let documents: Vec<SupplierDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Supplier::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: SupplierFilter) -> SupplierResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateSupplier) -> SupplierResult<Supplier> {
        let filter = Self::id_filter(id);
        let mut document = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(SupplierError::NotFound(id))?;

        document.apply_update(input);

        let result = self.collection.replace_one(filter, &document).await?;
        if result.matched_count == 0 {
            return Err(SupplierError::NotFound(id));
        }

        tracing::info!(supplier_id = %id, "Supplier updated successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> SupplierResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
