use itertools::Itertools;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::logic::bulk::{delete_sequentially, BulkDeleteOutcome};
use crate::logic::errors::{ActionError, FieldError};
use crate::logic::group_form::GroupForm;
use crate::logic::product_form::{ImageSource, ProductForm, ProductFormView};
use crate::model::{Group, Id, Notification, Product, ResolvedGroup, Selection};
use crate::store::{BlobStore, Store};

/// Notifications kept until the page is next rendered; older ones are dropped first
pub const MAX_PENDING_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub selected: bool,
}

/// Everything the page renders, taken in one go
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub products: Vec<ProductView>,
    pub groups: Vec<ResolvedGroup>,
    pub selection: Selection,
    pub bulk_actions_visible: bool,
    pub modal_open: bool,
    pub product_form: ProductFormView,
    pub group_form: GroupForm,
    pub notifications: Vec<Notification>,
}

/// Top-level page state: the loaded collections, the selection, the modal and
/// both forms. Every mutating action reloads the collection it touched.
pub struct PageController<S: Store> {
    store: Arc<S>,
    blobs: Arc<dyn BlobStore>,
    max_upload_bytes: usize,
    products: Vec<Product>,
    groups: Vec<Group>,
    selection: Selection,
    modal_open: bool,
    product_form: ProductForm,
    group_form: GroupForm,
    notifications: VecDeque<Notification>,
}

impl<S: Store> PageController<S> {
    pub fn new(store: Arc<S>, blobs: Arc<dyn BlobStore>, max_upload_bytes: usize) -> Self {
        Self {
            store,
            blobs,
            max_upload_bytes,
            products: Vec::new(),
            groups: Vec::new(),
            selection: Selection::new(),
            modal_open: false,
            product_form: ProductForm::new(),
            group_form: GroupForm::new(),
            notifications: VecDeque::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn product_form(&self) -> &ProductForm {
        &self.product_form
    }

    pub fn group_form(&self) -> &GroupForm {
        &self.group_form
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn pending_notifications(&self) -> &VecDeque<Notification> {
        &self.notifications
    }

    /// Initial load of both collections
    pub async fn load(&mut self) {
        self.load_products().await;
        self.load_groups().await;
    }

    /// Re-fetch all products. A failed fetch keeps the previous list.
    pub async fn load_products(&mut self) {
        match self.store.list_products().await {
            Ok(products) => {
                let pruned = self.selection.retain_loaded(&products);
                if pruned > 0 {
                    log::debug!("Dropped {} selected ids with no loaded product", pruned);
                }
                self.products = products;
            }
            Err(e) => log::error!("Error loading products: {:#}", e),
        }
    }

    /// Re-fetch all groups. A failed fetch keeps the previous list.
    pub async fn load_groups(&mut self) {
        match self.store.list_groups().await {
            Ok(groups) => self.groups = groups,
            Err(e) => log::error!("Error loading groups: {:#}", e),
        }
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Closing the modal discards whatever was typed into it
    pub fn close_modal(&mut self) {
        self.product_form.reset();
        self.modal_open = false;
    }

    /// Check or uncheck a product. Only loaded products can be checked.
    pub fn toggle_selection(&mut self, id: &str, included: bool) -> Result<(), ActionError> {
        if included && !self.products.iter().any(|p| p.id == id) {
            return Err(ActionError::Validation(vec![FieldError::UnknownProduct {
                id: id.to_string(),
            }]));
        }
        self.selection.toggle(id, included);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub async fn submit_product(
        &mut self,
        title: String,
        notes: String,
        image: Option<ImageSource>,
    ) -> Result<Product, ActionError> {
        self.product_form.fill(title, notes, image);

        let result = self
            .product_form
            .submit(self.store.as_ref(), self.blobs.as_ref(), self.max_upload_bytes)
            .await;

        match &result {
            Ok(product) => {
                log::info!("Added product {} ({})", product.id, product.title);
                self.notify(Notification::success("Product added"));
                self.close_modal();
                self.load_products().await;
            }
            Err(ActionError::Validation(errors)) => {
                self.notify(Notification::failure(validation_message(errors)));
            }
            Err(e) => {
                log::error!("Error adding product: {}", e);
                self.notify(Notification::failure("Failed to add product"));
            }
        }

        result
    }

    /// Per-item delete trigger from the product list
    pub async fn delete_product(&mut self, id: &Id) -> Result<(), ActionError> {
        let result = self.store.delete_product(id).await;

        let outcome = match result {
            Ok(_) => {
                log::info!("Deleted product {}", id);
                self.notify(Notification::success("Product deleted"));
                Ok(())
            }
            Err(e) => {
                log::error!("Error deleting product {}: {:#}", id, e);
                self.notify(Notification::failure("Failed to delete product"));
                Err(ActionError::Store(e))
            }
        };

        self.load_products().await;
        outcome
    }

    /// Delete every selected product, one call at a time.
    ///
    /// Deleted ids leave the selection; ids whose delete failed stay selected.
    pub async fn delete_selected(&mut self) -> Result<BulkDeleteOutcome, ActionError> {
        if self.selection.is_empty() {
            let errors = vec![FieldError::SelectionEmpty];
            self.notify(Notification::failure(validation_message(&errors)));
            return Err(ActionError::Validation(errors));
        }

        let ids = self.selection.snapshot();
        let outcome = delete_sequentially(self.store.as_ref(), &ids).await;

        self.selection.remove_all(&outcome.deleted);
        if outcome.is_complete() {
            log::info!("Deleted {} selected products", outcome.deleted.len());
            self.notify(Notification::success("Selected products deleted"));
        } else {
            log::error!(
                "Bulk delete finished with failures: {} deleted, failed [{}]",
                outcome.deleted.len(),
                outcome.failed.iter().map(|f| f.id.as_str()).join(", ")
            );
            self.notify(Notification::failure(format!(
                "Failed to delete {} of {} selected products",
                outcome.failed.len(),
                outcome.attempted()
            )));
        }

        self.load_products().await;
        Ok(outcome)
    }

    /// Create a group from the current selection
    pub async fn create_group(&mut self, name: String, notes: String) -> Result<Group, ActionError> {
        self.group_form.fill(name, notes);

        let result = self
            .group_form
            .submit(self.store.as_ref(), &self.selection)
            .await;

        match &result {
            Ok(group) => {
                log::info!(
                    "Created group {} ({}) with {} products",
                    group.id,
                    group.name,
                    group.products.len()
                );
                self.notify(Notification::success("Group created"));
                self.group_form.reset();
                self.selection.clear();
                self.load_groups().await;
            }
            Err(ActionError::Validation(errors)) => {
                self.notify(Notification::failure(validation_message(errors)));
            }
            Err(e) => {
                log::error!("Error creating group: {}", e);
                self.notify(Notification::failure("Failed to create group"));
                self.load_groups().await;
            }
        }

        result
    }

    /// Groups with each member resolved against the loaded products
    pub fn resolved_groups(&self) -> Vec<ResolvedGroup> {
        self.groups
            .iter()
            .map(|group| ResolvedGroup::resolve(group, &self.products))
            .collect()
    }

    /// Render the page. Pending notifications are handed out once.
    pub fn snapshot(&mut self) -> PageSnapshot {
        let products = self
            .products
            .iter()
            .map(|product| ProductView {
                selected: self.selection.contains(&product.id),
                product: product.clone(),
            })
            .collect();

        PageSnapshot {
            products,
            groups: self.resolved_groups(),
            selection: self.selection.clone(),
            bulk_actions_visible: self.selection.bulk_actions_visible(),
            modal_open: self.modal_open,
            product_form: self.product_form.view(),
            group_form: self.group_form.clone(),
            notifications: self.notifications.drain(..).collect(),
        }
    }

    fn notify(&mut self, notification: Notification) {
        while self.notifications.len() >= MAX_PENDING_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }
}

fn validation_message(errors: &[FieldError]) -> String {
    format!("Please fix: {}", errors.iter().join(", "))
}
