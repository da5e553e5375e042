use crate::model::{Group, Id, NewGroup, NewProduct, Product};
use anyhow::Result;

/// Document operations on the "products" collection
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Create a product; the store assigns its identifier
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
    /// List every product in creation order
    async fn list_products(&self) -> Result<Vec<Product>>;
    /// Delete a product by identifier. Returns false when nothing matched.
    async fn delete_product(&self, id: &Id) -> Result<bool>;
}

/// Document operations on the "groups" collection
#[async_trait::async_trait]
pub trait GroupStore: Send + Sync {
    /// Create a group; the store assigns its identifier
    async fn create_group(&self, group: NewGroup) -> Result<Group>;
    /// List every group in creation order
    async fn list_groups(&self) -> Result<Vec<Group>>;
}

/// Content store for uploaded product images
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return a publicly retrievable URL
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<String>;
}

pub trait Store: ProductStore + GroupStore + Send + Sync {}

impl<T: ProductStore + GroupStore + Send + Sync> Store for T {}
