use serde::Serialize;

use crate::logic::errors::{ActionError, FieldError};
use crate::model::{trimmed_optional, Group, NewGroup, Selection};
use crate::store::GroupStore;

/// The "create group from selection" fields of the bulk actions panel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupForm {
    pub name: String,
    pub notes: String,
    errors: Vec<FieldError>,
}

impl GroupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, name: String, notes: String) {
        self.name = name;
        self.notes = notes;
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&mut self, selection: &Selection) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::GroupNameRequired);
        }
        if selection.is_empty() {
            errors.push(FieldError::SelectionEmpty);
        }

        self.errors = errors.clone();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Create one group whose membership is a snapshot of `selection`
    pub async fn submit<S>(&mut self, store: &S, selection: &Selection) -> Result<Group, ActionError>
    where
        S: GroupStore + ?Sized,
    {
        self.validate(selection).map_err(ActionError::Validation)?;

        let group = store
            .create_group(NewGroup {
                name: self.name.trim().to_string(),
                notes: trimmed_optional(&self.notes),
                products: selection.snapshot(),
            })
            .await?;

        Ok(group)
    }
}
