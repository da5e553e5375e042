use serde::Serialize;

use crate::model::Id;
use crate::store::ProductStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDelete {
    pub id: Id,
    pub reason: String,
}

/// Per-item result of deleting a batch of products
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<Id>,
    pub failed: Vec<FailedDelete>,
}

impl BulkDeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

/// Delete `ids` one at a time, awaiting each call before the next.
///
/// A failure does not stop the batch and nothing is rolled back. An identifier the
/// store no longer holds counts as deleted.
pub async fn delete_sequentially<S>(store: &S, ids: &[Id]) -> BulkDeleteOutcome
where
    S: ProductStore + ?Sized,
{
    let mut outcome = BulkDeleteOutcome::default();

    for id in ids {
        match store.delete_product(id).await {
            Ok(found) => {
                if !found {
                    log::debug!("Product {} was already gone", id);
                }
                outcome.deleted.push(id.clone());
            }
            Err(e) => {
                log::error!("Error deleting product {}: {:#}", id, e);
                outcome.failed.push(FailedDelete {
                    id: id.clone(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    outcome
}
