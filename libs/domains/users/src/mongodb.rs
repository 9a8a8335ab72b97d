//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use database::mongodb::uuid_bson;
use domain_products::{PRODUCTS_COLLECTION, Product};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Bson, Document, doc, to_bson},
    options::IndexOptions,
};
use pagination::PageRequest;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, PurchaseFacet, PurchasedProductsPage, UpdateUser, User, UserDocument, UserFilter,
};
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

/// Aggregation joining one user's purchase set against `products_collection`.
///
/// Rows whose product no longer exists are dropped by the second `$unwind`,
/// so `total` counts joined rows only. The sort, when requested, is applied
/// inside the `items` branch before the window.
pub fn purchased_products_pipeline(
    user_id: Uuid,
    page: &PageRequest,
    products_collection: &str,
) -> Vec<Document> {
    let mut items = Vec::with_capacity(4);
    if let Some(sort) = page.sort_document(Some("product")) {
        items.push(doc! { "$sort": sort });
    }
    items.extend(page.window_stages());
    items.push(doc! { "$replaceRoot": { "newRoot": "$product" } });

    vec![
        doc! { "$match": { "_id": uuid_bson(user_id) } },
        doc! { "$unwind": "$purchased_products" },
        doc! {
            "$lookup": {
                "from": products_collection,
                "localField": "purchased_products",
                "foreignField": "_id",
                "as": "product",
            }
        },
        doc! { "$unwind": "$product" },
        doc! {
            "$facet": {
                "total": [{ "$count": "count" }],
                "items": items,
            }
        },
    ]
}

/// Turn the single `$facet` output document into a page.
///
/// No output document means the user matched nothing and yields an empty page.
pub fn parse_purchased_products(
    result: Option<Document>,
    page: &PageRequest,
) -> UserResult<PurchasedProductsPage> {
    let Some(result) = result else {
        return Ok(PurchasedProductsPage::empty(page));
    };

    let facet: PurchaseFacet = bson::from_document(result)?;
    let total = facet.total.first().map(|c| c.count).unwrap_or(0);

    Ok(PurchasedProductsPage {
        total,
        page: page.page(),
        limit: page.limit(),
        items: facet.items.into_iter().map(Product::from).collect(),
    })
}

pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
    products_collection: String,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<UserDocument>(USERS_COLLECTION),
            products_collection: PRODUCTS_COLLECTION.to_string(),
        }
    }

    /// Unique index on `email`
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    pub(crate) fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_bson(id) }
    }

    pub(crate) fn add_purchase_update(product_id: Uuid) -> Document {
        doc! { "$addToSet": { "purchased_products": uuid_bson(product_id) } }
    }

    pub(crate) fn remove_purchase_update(product_id: Uuid) -> Document {
        doc! { "$pull": { "purchased_products": uuid_bson(product_id) } }
    }

    pub(crate) fn build_filter(filter: &UserFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref email) = filter.email {
            doc.insert("email", email);
        }
        if let Some(ref name) = filter.name {
            doc.insert("name", name);
        }
        if let Some(is_active) = filter.is_active {
            doc.insert("is_active", is_active);
        }
        if let Some(is_staff) = filter.is_staff {
            doc.insert("is_staff", is_staff);
        }
        if let Some(is_superuser) = filter.is_superuser {
            doc.insert("is_superuser", is_superuser);
        }

        doc
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let document = UserDocument::new(input);

        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| UserError::from_write(e, &document.email))?;

        tracing::info!(user_id = %document.id, "User created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let document = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(document.map(User::from))
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let document = self.collection.find_one(doc! { "email": email }).await?;
        Ok(document.map(User::from))
    }

    #[instrument(skip(self))]
    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter, page: PageRequest) -> UserResult<Vec<User>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page.find_options())
            .await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: UserFilter) -> UserResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let filter = Self::id_filter(id);
        let mut document = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(UserError::NotFound(id))?;

        document.apply_update(input);

        // Only the profile fields are written so a concurrent purchase is not lost.
        let set = doc! {
            "schema_version": i64::from(document.schema_version),
            "email": &document.email,
            "name": &document.name,
            "status": document.status,
            "is_active": document.is_active,
            "is_staff": document.is_staff,
            "is_superuser": document.is_superuser,
            "updated_at": to_bson(&document.updated_at).unwrap_or(Bson::Null),
        };

        let result = self
            .collection
            .update_one(filter, doc! { "$set": set })
            .await
            .map_err(|e| UserError::from_write(e, &document.email))?;
        if result.matched_count == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "User updated successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        let deleted = result.deleted_count > 0;
        if deleted {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn add_purchase(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let result = self
            .collection
            .update_one(
                Self::id_filter(user_id),
                Self::add_purchase_update(product_id),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn remove_purchase(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let result = self
            .collection
            .update_one(
                Self::id_filter(user_id),
                Self::remove_purchase_update(product_id),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn purchased_products(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> UserResult<PurchasedProductsPage> {
        let pipeline = purchased_products_pipeline(user_id, &page, &self.products_collection);

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let result = cursor.try_next().await?;

        parse_purchased_products(result, &page)
    }
}
