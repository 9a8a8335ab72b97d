//! Small success bodies shared by the CRUD routers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// `201 Created` body carrying the generated identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

impl CreatedResponse {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Plain confirmation, e.g. after a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
