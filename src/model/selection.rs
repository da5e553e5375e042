use crate::model::{Id, Product};
use serde::Serialize;
use std::collections::HashSet;

/// Product identifiers the user has checked for bulk operations.
///
/// Membership is unique. Iteration follows insertion order so a group created from
/// the selection lists its products in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<Id>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` when `included` is true, remove it otherwise. Repeating a call is a no-op.
    pub fn toggle(&mut self, id: &str, included: bool) {
        if included {
            if !self.contains(id) {
                self.ids.push(id.to_string());
            }
        } else {
            self.ids.retain(|existing| existing != id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The bulk actions panel is shown iff something is selected
    pub fn bulk_actions_visible(&self) -> bool {
        !self.is_empty()
    }

    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Ordered copy of the current contents, detached from later toggles
    pub fn snapshot(&self) -> Vec<Id> {
        self.ids.clone()
    }

    pub fn remove_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a Id>) {
        let removed: HashSet<&Id> = ids.into_iter().collect();
        self.ids.retain(|id| !removed.contains(id));
    }

    /// Drop identifiers that no longer correspond to a loaded product
    pub fn retain_loaded(&mut self, products: &[Product]) -> usize {
        let loaded: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        let before = self.ids.len();
        self.ids.retain(|id| loaded.contains(id.as_str()));
        before - self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_in_then_out_restores_empty() {
        let mut selection = Selection::new();
        selection.toggle("p1", true);
        assert!(selection.contains("p1"));
        assert!(selection.bulk_actions_visible());

        selection.toggle("p1", false);
        assert!(selection.is_empty());
        assert!(!selection.bulk_actions_visible());
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut selection = Selection::new();
        selection.toggle("p1", true);
        selection.toggle("p1", true);
        selection.toggle("p2", true);
        assert_eq!(selection.len(), 2);

        selection.toggle("p3", false);
        assert_eq!(selection.ids(), &["p1".to_string(), "p2".to_string()]);
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut selection = Selection::new();
        selection.toggle("p2", true);
        selection.toggle("p1", true);
        let snapshot = selection.snapshot();
        selection.clear();

        assert_eq!(snapshot, vec!["p2".to_string(), "p1".to_string()]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_loaded_prunes_unknown_ids() {
        let mut selection = Selection::new();
        selection.toggle("p1", true);
        selection.toggle("ghost", true);

        let products = vec![Product {
            id: "p1".to_string(),
            title: "One".to_string(),
            notes: None,
            image: "https://img.example/1.png".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }];

        assert_eq!(selection.retain_loaded(&products), 1);
        assert_eq!(selection.ids(), &["p1".to_string()]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut selection = Selection::new();
        selection.toggle("a", true);
        assert_eq!(serde_json::to_string(&selection).unwrap(), r#"["a"]"#);
    }
}
