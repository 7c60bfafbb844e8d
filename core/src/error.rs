//! Error types for catalog operations.
//!
//! [`CatalogError`] covers the whole taxonomy: unsupported categories and
//! validation failures are user-correctable and rendered as field errors;
//! storage failures are fatal for the request and never expose backend
//! detail in their `Display` output.

use serde_json::{Value, json};
use thiserror::Error;

use crate::category::Category;
use crate::schema::TYPE_FIELD;
use crate::validate::ErrorMap;

/// The discriminator does not name a supported category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Category '{value}' is not supported. Supported categories: {}.", .supported.join(", "))]
pub struct UnsupportedCategory {
    /// The offending discriminator value.
    pub value: String,
    /// Every supported discriminator.
    pub supported: Vec<&'static str>,
}

impl UnsupportedCategory {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            supported: Category::names(),
        }
    }
}

/// Opaque failure of the persistence layer.
///
/// The backend error is kept as the [`source`](std::error::Error::source)
/// for logging; the message itself stays generic.
#[derive(Debug, Error)]
#[error("storage operation failed")]
pub struct StorageError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StorageError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Errors that can occur while creating, loading, saving or deleting products.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// `type` is missing or not one of the supported categories.
    #[error(transparent)]
    UnsupportedCategory(#[from] UnsupportedCategory),

    /// One or more fields failed validation.
    #[error("invalid data: {0}")]
    Validation(ErrorMap),

    /// Request input has the wrong shape.
    #[error("{0}")]
    InvalidInput(String),

    /// No stored product has the given id.
    #[error("product {0} not found")]
    NotFound(i64),

    /// Attempted to delete a product that was never saved.
    #[error("product has not been saved")]
    NotPersisted,

    /// A stored row could not be mapped back to a product.
    #[error("stored row {id:?} is unreadable: {reason}")]
    CorruptRow { id: Option<i64>, reason: String },

    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// Returns the HTTP-class status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::UnsupportedCategory(_)
            | Self::Validation(_)
            | Self::InvalidInput(_)
            | Self::NotPersisted => 400,
            Self::NotFound(_) => 404,
            Self::CorruptRow { .. } | Self::Storage(_) => 500,
        }
    }

    /// Returns `true` for errors the client can fix by changing its input.
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }

    /// Renders the response body for this error.
    ///
    /// Field-level errors become an object keyed by field name; everything
    /// else is a JSON string. Server-side failures use a generic message.
    pub fn body(&self) -> Value {
        match self {
            Self::Validation(errors) => json!(errors),
            Self::UnsupportedCategory(err) => json!({ TYPE_FIELD: err.to_string() }),
            Self::NotFound(_) => json!("Product not found"),
            Self::InvalidInput(_) | Self::NotPersisted => json!(self.to_string()),
            Self::CorruptRow { .. } | Self::Storage(_) => json!("Internal server error"),
        }
    }
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_category_message_lists_supported() {
        let err = UnsupportedCategory::new("Vinyl");
        assert_eq!(
            err.to_string(),
            "Category 'Vinyl' is not supported. Supported categories: DVD, Furniture, Book."
        );
    }

    #[test]
    fn test_unsupported_category_is_a_type_field_error() {
        let err = CatalogError::from(UnsupportedCategory::new("Vinyl"));
        assert_eq!(err.status(), 400);
        assert!(err.body()["type"].as_str().unwrap().contains("'Vinyl'"));
    }

    #[test]
    fn test_storage_error_hides_backend_detail() {
        let err = CatalogError::from(StorageError::new("disk I/O error at page 42"));
        assert_eq!(err.status(), 500);
        assert!(!err.is_client_error());
        assert_eq!(err.body(), json!("Internal server error"));
        assert!(!err.to_string().contains("page 42"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk I/O error at page 42"));
    }

    #[test]
    fn test_validation_body_is_error_map() {
        let mut errors = ErrorMap::new();
        errors.insert("name", "Field 'name' of type 'text' is required.");
        let err = CatalogError::Validation(errors);
        assert_eq!(err.status(), 400);
        assert_eq!(
            err.body(),
            json!({"name": "Field 'name' of type 'text' is required."})
        );
    }

    #[test]
    fn test_not_found_status() {
        let err = CatalogError::NotFound(12);
        assert_eq!(err.status(), 404);
        assert_eq!(err.body(), json!("Product not found"));
    }
}
