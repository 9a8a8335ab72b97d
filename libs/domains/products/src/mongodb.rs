//! MongoDB implementation of ProductRepository

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

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductDocument, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Name of the collection holding products
pub const PRODUCTS_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Use a different collection name (tests run against throwaway collections)
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    /// Indexes backing the list filters
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "supplier_id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_supplier_id".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "cost_price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_cost_price".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().name("idx_name".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    pub(crate) fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_bson(id) }
    }

    /// Translate a [`ProductFilter`] into a query document
    pub(crate) fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref name) = filter.name {
            doc.insert("name", name);
        }

        if let Some(supplier_id) = filter.supplier_id {
            doc.insert("supplier_id", uuid_bson(supplier_id));
        }

        if let Some(range) = filter.cost_price.to_bson() {
            doc.insert("cost_price", range);
        }

        doc
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let document = ProductDocument::new(input);

        self.collection.insert_one(&document).await?;

        tracing::info!(product_id = %document.id, "Product created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter, page: PageRequest) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page.find_options())
            .await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let filter = Self::id_filter(id);
        let mut document = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(ProductError::NotFound(id))?;

        document.apply_update(input);

        let result = self.collection.replace_one(filter, &document).await?;
        if result.matched_count == 0 {
            // Deleted between the read and the write
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        let deleted = result.deleted_count > 0;
        if deleted {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;
    use pagination::RangeFilter;

    fn stored(document: &ProductDocument) -> Document {
        // insert_one goes through the raw serializer
        bson::to_raw_document_buf(document)
            .unwrap()
            .to_document()
            .unwrap()
    }

    fn new_document(supplier_id: Uuid) -> ProductDocument {
        ProductDocument::new(CreateProduct {
            name: "Desk Lamp".to_string(),
            description: String::new(),
            cost_price: 25.0,
            profit_margin: None,
            quantity: 3,
            supplier_id,
        })
    }

    #[test]
    fn test_id_filter_matches_inserted_document() {
        let document = new_document(Uuid::now_v7());
        let written = stored(&document);

        let filter = MongoProductRepository::id_filter(document.id);
        assert_eq!(filter.get("_id"), written.get("_id"));
    }

    #[test]
    fn test_supplier_filter_matches_inserted_document() {
        let supplier_id = Uuid::now_v7();
        let written = stored(&new_document(supplier_id));

        let filter = MongoProductRepository::build_filter(&ProductFilter {
            supplier_id: Some(supplier_id),
            ..Default::default()
        });
        assert_eq!(filter.get("supplier_id"), written.get("supplier_id"));
    }

    #[test]
    fn test_inserted_document_reads_back_with_price() {
        let supplier_id = Uuid::now_v7();
        let document = new_document(supplier_id);
        let raw = bson::to_raw_document_buf(&document).unwrap();

        let read: ProductDocument = bson::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(read, document);

        let product = Product::from(read);
        assert_eq!(product.supplier_id, supplier_id);
        assert!((product.price - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_filter_empty() {
        assert_eq!(
            MongoProductRepository::build_filter(&ProductFilter::default()),
            doc! {}
        );
    }

    #[test]
    fn test_build_filter_equality_and_range() {
        let supplier_id = Uuid::now_v7();
        let filter = ProductFilter {
            name: Some("Desk Lamp".to_string()),
            supplier_id: Some(supplier_id),
            cost_price: RangeFilter::new(Some(10.0), Some(20.0)),
        };

        let doc = MongoProductRepository::build_filter(&filter);

        assert_eq!(doc.get_str("name").unwrap(), "Desk Lamp");
        assert_eq!(doc.get("supplier_id"), Some(&uuid_bson(supplier_id)));
        assert_eq!(
            doc.get_document("cost_price").unwrap(),
            &doc! { "$gte": 10.0, "$lte": 20.0 }
        );
    }

    #[test]
    fn test_build_filter_open_range() {
        let filter = ProductFilter {
            cost_price: RangeFilter::new(Some(5.0), None),
            ..Default::default()
        };

        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc, doc! { "cost_price": { "$gte": 5.0 } });
    }
}
