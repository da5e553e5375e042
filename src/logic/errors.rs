use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// Client-side validation failures. None of them reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum FieldError {
    #[error("title is required")]
    TitleRequired,
    #[error("image is required")]
    ImageRequired,
    #[error("file is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },
    #[error("group name is required")]
    GroupNameRequired,
    #[error("no products are selected")]
    SelectionEmpty,
    #[error("product {id} is not loaded")]
    UnknownProduct { id: String },
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("validation failed: {}", .0.iter().join(", "))]
    Validation(Vec<FieldError>),
    #[error("store operation failed: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl ActionError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ActionError::Validation(errors) => errors,
            ActionError::Store(_) => &[],
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ActionError::Validation(_))
    }
}
