use crate::model::{generate_id, now_timestamp, Id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub image: String,
    pub created_at: String, // ISO 8601 timestamp
}

/// Payload for the create-document call on the products collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub image: String,
}

impl Product {
    pub fn from_new(new_product: NewProduct) -> Self {
        Self {
            id: generate_id(),
            title: new_product.title,
            notes: new_product.notes,
            image: new_product.image,
            created_at: now_timestamp(),
        }
    }
}
