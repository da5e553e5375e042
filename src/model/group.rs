use crate::model::{generate_id, now_timestamp, Id, Product};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named snapshot of product identifiers.
///
/// `products` is copied from the selection when the group is created and is never
/// updated afterwards, so it may name products that have since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub products: Vec<Id>,
    pub created_at: String, // ISO 8601 timestamp
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub products: Vec<Id>,
}

impl Group {
    pub fn from_new(new_group: NewGroup) -> Self {
        Self {
            id: generate_id(),
            name: new_group.name,
            notes: new_group.notes,
            products: new_group.products,
            created_at: now_timestamp(),
        }
    }
}

/// One entry of a group's membership, resolved against the loaded products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMember {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGroup {
    pub id: Id,
    pub name: String,
    pub notes: Option<String>,
    pub members: Vec<GroupMember>,
    pub product_count: usize,
    pub stale_count: usize,
}

impl ResolvedGroup {
    /// Resolve every stored identifier against `products`.
    ///
    /// Identifiers with no matching product are kept and flagged as stale.
    pub fn resolve(group: &Group, products: &[Product]) -> Self {
        let by_id: HashMap<&str, &Product> =
            products.iter().map(|p| (p.id.as_str(), p)).collect();

        let members: Vec<GroupMember> = group
            .products
            .iter()
            .map(|id| {
                let product = by_id.get(id.as_str()).map(|p| (*p).clone());
                GroupMember {
                    id: id.clone(),
                    stale: product.is_none(),
                    product,
                }
            })
            .collect();

        let stale_count = members.iter().filter(|m| m.stale).count();

        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            notes: group.notes.clone(),
            product_count: members.len(),
            stale_count,
            members,
        }
    }
}
