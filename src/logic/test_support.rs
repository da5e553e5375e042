//! Store doubles that record every call and can be told to fail.

use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::collections::HashSet;

use crate::model::{Group, Id, NewGroup, NewProduct, Product};
use crate::store::{BlobStore, GroupStore, MemoryStore, ProductStore};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    CreateProduct(NewProduct),
    ListProducts,
    DeleteProduct(Id),
    CreateGroup(NewGroup),
    ListGroups,
}

#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
    fail_deletes: Mutex<HashSet<Id>>,
    fail_creates: Mutex<bool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn create_product_calls(&self) -> Vec<NewProduct> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::CreateProduct(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn create_group_calls(&self) -> Vec<NewGroup> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::CreateGroup(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    pub fn delete_calls(&self) -> Vec<Id> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::DeleteProduct(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn fail_delete_of(&self, id: &str) {
        self.fail_deletes.lock().insert(id.to_string());
    }

    pub fn fail_creates(&self, fail: bool) {
        *self.fail_creates.lock() = fail;
    }

    pub async fn seed_product(&self, title: &str) -> Product {
        self.inner
            .create_product(NewProduct {
                title: title.to_string(),
                notes: None,
                image: format!("https://img.example/{}.png", title.to_lowercase()),
            })
            .await
            .expect("memory store never fails")
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait::async_trait]
impl ProductStore for RecordingStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        self.record(StoreCall::CreateProduct(product.clone()));
        if *self.fail_creates.lock() {
            return Err(anyhow!("permission denied"));
        }
        self.inner.create_product(product).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.record(StoreCall::ListProducts);
        self.inner.list_products().await
    }

    async fn delete_product(&self, id: &Id) -> Result<bool> {
        self.record(StoreCall::DeleteProduct(id.clone()));
        if self.fail_deletes.lock().contains(id) {
            return Err(anyhow!("network unreachable"));
        }
        self.inner.delete_product(id).await
    }
}

#[async_trait::async_trait]
impl GroupStore for RecordingStore {
    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        self.record(StoreCall::CreateGroup(group.clone()));
        if *self.fail_creates.lock() {
            return Err(anyhow!("quota exceeded"));
        }
        self.inner.create_group(group).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.record(StoreCall::ListGroups);
        self.inner.list_groups().await
    }
}

#[derive(Debug, Default)]
pub struct RecordingBlobStore {
    keys: Mutex<Vec<String>>,
}

impl RecordingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }
}

#[async_trait::async_trait]
impl BlobStore for RecordingBlobStore {
    async fn put(&self, key: &str, _bytes: Vec<u8>, _content_type: Option<&str>) -> Result<String> {
        self.keys.lock().push(key.to_string());
        Ok(format!("https://cdn.example/{}", key))
    }
}

/// Upload boundary that is always down
#[derive(Debug, Default)]
pub struct FailingBlobStore;

#[async_trait::async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, _key: &str, _bytes: Vec<u8>, _content_type: Option<&str>) -> Result<String> {
        Err(anyhow!("bucket unavailable"))
    }
}
