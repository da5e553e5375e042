use anyhow::Result;
use parking_lot::RwLock;

use crate::model::{Group, Id, NewGroup, NewProduct, Product};
use crate::store::traits::{GroupStore, ProductStore};

/// In-process document store used when no database is configured, and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
    groups: RwLock<Vec<Group>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_count(&self) -> usize {
        self.products.read().len()
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let product = Product::from_new(product);
        self.products.write().push(product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().clone())
    }

    async fn delete_product(&self, id: &Id) -> Result<bool> {
        let mut products = self.products.write();
        let before = products.len();
        products.retain(|p| &p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait::async_trait]
impl GroupStore for MemoryStore {
    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let group = Group::from_new(group);
        self.groups.write().push(group.clone());
        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.groups.read().clone())
    }
}
