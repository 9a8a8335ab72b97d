use chrono::{DateTime, Duration, Utc};
use pagination::{PageError, PageRequest, RangeFilter, SortOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Layout version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Margin applied when a product does not specify one
pub const DEFAULT_PROFIT_MARGIN: f64 = 0.20;

fn default_profit_margin() -> f64 {
    DEFAULT_PROFIT_MARGIN
}

/// Advance `previous` to now, or by one microsecond if the clock has not moved.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// A product as stored in the `products` collection.
///
/// `price` is not part of the stored shape. Documents written before
/// `schema_version` existed read as version 0 and pick up the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id", with = "database::mongodb::uuid_as_binary")]
    pub id: Uuid,
    #[serde(default)]
    pub schema_version: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost_price: f64,
    #[serde(default = "default_profit_margin")]
    pub profit_margin: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(with = "database::mongodb::uuid_as_binary")]
    pub supplier_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDocument {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            schema_version: CURRENT_SCHEMA_VERSION,
            name: input.name,
            description: input.description,
            cost_price: input.cost_price,
            profit_margin: input.profit_margin.unwrap_or(DEFAULT_PROFIT_MARGIN),
            quantity: input.quantity,
            supplier_id: input.supplier_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields; `updated_at` always moves forward.
    ///
    /// Writing the document back also stamps the current schema version.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(cost_price) = update.cost_price {
            self.cost_price = cost_price;
        }
        if let Some(profit_margin) = update.profit_margin {
            self.profit_margin = profit_margin;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(supplier_id) = update.supplier_id {
            self.supplier_id = supplier_id;
        }
        self.schema_version = CURRENT_SCHEMA_VERSION;
        self.updated_at = next_timestamp(self.updated_at);
    }

    /// Selling price: cost plus margin
    pub fn price(&self) -> f64 {
        self.cost_price * (1.0 + self.profit_margin)
    }
}

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub cost_price: f64,
    pub profit_margin: f64,
    /// `cost_price * (1 + profit_margin)`, computed on every read
    pub price: f64,
    pub quantity: i64,
    pub supplier_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        let price = doc.price();
        Self {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            cost_price: doc.cost_price,
            profit_margin: doc.profit_margin,
            price,
            quantity: doc.quantity,
            supplier_id: doc.supplier_id,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(exclusive_min = 0.0))]
    pub cost_price: f64,
    /// Defaults to 0.20
    #[validate(range(min = 0.0))]
    pub profit_margin: Option<f64>,
    #[validate(range(min = 0))]
    pub quantity: i64,
    pub supplier_id: Uuid,
}

/// DTO for a partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub cost_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub profit_margin: Option<f64>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    pub supplier_id: Option<Uuid>,
}

/// Fields a product listing can be ordered by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductSortField {
    Name,
    CostPrice,
    ProfitMargin,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

/// Store-level filter: equality on name and supplier, inclusive range on cost
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub cost_price: RangeFilter,
}

/// Query string accepted by `GET /products`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, starting at 1
    #[serde(default = "pagination::default_page")]
    #[validate(range(min = 1))]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    /// Page size
    #[serde(default = "pagination::default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: u64,
    pub sort_by: Option<ProductSortField>,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Exact product name
    pub name: Option<String>,
    /// Inclusive lower bound on cost_price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on cost_price
    pub max_price: Option<f64>,
    pub supplier_id: Option<Uuid>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: pagination::DEFAULT_PAGE,
            limit: pagination::DEFAULT_LIMIT,
            sort_by: None,
            sort_order: SortOrder::default(),
            name: None,
            min_price: None,
            max_price: None,
            supplier_id: None,
        }
    }
}

impl ProductQuery {
    /// Split into the store filter and the page window
    pub fn into_parts(self) -> Result<(ProductFilter, PageRequest), PageError> {
        let cost_price = RangeFilter::new(self.min_price, self.max_price);
        cost_price.validate("cost_price")?;

        let page = PageRequest::new(self.page, self.limit)?
            .with_optional_sort(self.sort_by, self.sort_order);

        let filter = ProductFilter {
            name: self.name,
            supplier_id: self.supplier_id,
            cost_price,
        };
        Ok((filter, page))
    }
}

/// One page of products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    /// Matches across all pages
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub products: Vec<Product>,
}
