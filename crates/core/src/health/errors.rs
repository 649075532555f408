//! Category registry error types.
//!
//! Classification itself never fails; these errors only surface while a
//! catalog of category definitions is validated at load time.

use thiserror::Error;

/// Errors raised while building a [`CategoryRegistry`](super::CategoryRegistry).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// A category definition has an empty key.
    #[error("Category key must not be empty (label: '{0}')")]
    EmptyKey(String),

    /// Two definitions share one key.
    #[error("Duplicate category key: {0}")]
    DuplicateKey(String),

    /// A rule of a category cannot be evaluated.
    #[error("Invalid rule #{index} in category '{category}': {message}")]
    InvalidRule {
        category: String,
        index: usize,
        message: String,
    },
}

impl RegistryError {
    /// Creates an InvalidRule error.
    pub fn invalid_rule(category: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            category: category.into(),
            index,
            message: message.into(),
        }
    }
}
