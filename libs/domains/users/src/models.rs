use chrono::{DateTime, Duration, Utc};
use domain_products::{Product, ProductDocument, ProductSortField};
use pagination::{PageError, PageRequest, SortOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Layout version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_true() -> bool {
    true
}

fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// A user as stored in the `users` collection.
///
/// `purchased_products` has set semantics; it is only ever changed with
/// `$addToSet` and `$pull`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", with = "database::mongodb::uuid_as_binary")]
    pub id: Uuid,
    #[serde(default)]
    pub schema_version: u32,
    pub email: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub status: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default, with = "database::mongodb::uuid_vec_as_binary")]
    pub purchased_products: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDocument {
    pub fn new(input: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            schema_version: CURRENT_SCHEMA_VERSION,
            email: input.email,
            name: input.name,
            status: input.status,
            is_active: input.is_active,
            is_staff: input.is_staff,
            is_superuser: input.is_superuser,
            purchased_products: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields. Purchases are never touched here.
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(is_staff) = update.is_staff {
            self.is_staff = is_staff;
        }
        if let Some(is_superuser) = update.is_superuser {
            self.is_superuser = is_superuser;
        }
        self.schema_version = CURRENT_SCHEMA_VERSION;
        self.updated_at = touch(self.updated_at);
    }
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub status: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Ids of purchased products
    pub purchased_products: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            email: doc.email,
            name: doc.name,
            status: doc.status,
            is_active: doc.is_active,
            is_staff: doc.is_staff,
            is_superuser: doc.is_superuser,
            purchased_products: doc.purchased_products,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default = "default_true")]
    pub status: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub status: Option<bool>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserSortField {
    Email,
    Name,
    CreatedAt,
    UpdatedAt,
}

/// Equality filters for listing users
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Query string accepted by `GET /users`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    #[serde(default = "pagination::default_page")]
    #[validate(range(min = 1))]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    #[serde(default = "pagination::default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: u64,
    pub sort_by: Option<UserSortField>,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: pagination::DEFAULT_PAGE,
            limit: pagination::DEFAULT_LIMIT,
            sort_by: None,
            sort_order: SortOrder::default(),
            email: None,
            name: None,
            is_active: None,
            is_staff: None,
            is_superuser: None,
        }
    }
}

impl UserQuery {
    pub fn into_parts(self) -> Result<(UserFilter, PageRequest), PageError> {
        let page = PageRequest::new(self.page, self.limit)?
            .with_optional_sort(self.sort_by, self.sort_order);

        let filter = UserFilter {
            email: self.email,
            name: self.name,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        };
        Ok((filter, page))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserPage {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub users: Vec<User>,
}

/// Query string accepted by `GET /users/{id}/purchases`; sort keys are product fields
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchasesQuery {
    #[serde(default = "pagination::default_page")]
    #[validate(range(min = 1))]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    #[serde(default = "pagination::default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: u64,
    pub sort_by: Option<ProductSortField>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for PurchasesQuery {
    fn default() -> Self {
        Self {
            page: pagination::DEFAULT_PAGE,
            limit: pagination::DEFAULT_LIMIT,
            sort_by: None,
            sort_order: SortOrder::default(),
        }
    }
}

impl PurchasesQuery {
    pub fn into_page(self) -> Result<PageRequest, PageError> {
        Ok(PageRequest::new(self.page, self.limit)?
            .with_optional_sort(self.sort_by, self.sort_order))
    }
}

/// Body of `POST /purchases` and `DELETE /purchases`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PurchaseRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
}

/// One page of a user's purchased products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PurchasedProductsPage {
    /// Joined purchases across all pages; dangling references are not counted
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub items: Vec<Product>,
}

impl PurchasedProductsPage {
    pub fn empty(page: &PageRequest) -> Self {
        Self {
            total: 0,
            page: page.page(),
            limit: page.limit(),
            items: Vec::new(),
        }
    }
}

/// Shape of the `$facet` output of the purchased-products pipeline
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PurchaseFacet {
    #[serde(default)]
    pub total: Vec<FacetCount>,
    #[serde(default)]
    pub items: Vec<ProductDocument>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacetCount {
    pub count: u64,
}
