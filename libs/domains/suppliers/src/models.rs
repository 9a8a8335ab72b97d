use chrono::{DateTime, Duration, Utc};
use pagination::{PageError, PageRequest, SortOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Layout version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// A supplier as stored in the `suppliers` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDocument {
    #[serde(rename = "_id", with = "database::mongodb::uuid_as_binary")]
    pub id: Uuid,
    #[serde(default)]
    pub schema_version: u32,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierDocument {
    pub fn new(input: CreateSupplier) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            schema_version: CURRENT_SCHEMA_VERSION,
            name: input.name,
            contact_email: input.contact_email,
            phone: input.phone,
            address: input.address,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateSupplier) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(contact_email) = update.contact_email {
            self.contact_email = Some(contact_email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        self.schema_version = CURRENT_SCHEMA_VERSION;
        self.updated_at = touch(self.updated_at);
    }
}

/// Supplier as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SupplierDocument> for Supplier {
    fn from(doc: SupplierDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            contact_email: doc.contact_email,
            phone: doc.phone,
            address: doc.address,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSupplier {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SupplierSortField {
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierFilter {
    pub name: Option<String>,
}

/// Query string accepted by `GET /suppliers`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplierQuery {
    #[serde(default = "pagination::default_page")]
    #[validate(range(min = 1))]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    #[serde(default = "pagination::default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: u64,
    pub sort_by: Option<SupplierSortField>,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Exact supplier name
    pub name: Option<String>,
}

impl Default for SupplierQuery {
    fn default() -> Self {
        Self {
            page: pagination::DEFAULT_PAGE,
            limit: pagination::DEFAULT_LIMIT,
            sort_by: None,
            sort_order: SortOrder::default(),
            name: None,
        }
    }
}

impl SupplierQuery {
    pub fn into_parts(self) -> Result<(SupplierFilter, PageRequest), PageError> {
        let page = PageRequest::new(self.page, self.limit)?
            .with_optional_sort(self.sort_by, self.sort_order);
        Ok((SupplierFilter { name: self.name }, page))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierPage {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub suppliers: Vec<Supplier>,
}
