//! Product categories and discriminator resolution.
//!
//! The set of categories is closed: a discriminator either names one of the
//! [`Category::ALL`] variants exactly, or resolution fails with
//! [`UnsupportedCategory`].
//!
//! # Examples
//!
//! ```
//! use catalog_core::Category;
//! use serde_json::json;
//!
//! assert_eq!(Category::resolve(Some(&json!("Book"))).unwrap(), Category::Book);
//!
//! let err = Category::resolve(Some(&json!("Vinyl"))).unwrap_err();
//! assert_eq!(err.value, "Vinyl");
//! assert_eq!(err.supported, vec!["DVD", "Furniture", "Book"]);
//! ```

use std::fmt;

use serde_json::Value;

use crate::descriptor::FieldDescriptor;
use crate::error::UnsupportedCategory;
use crate::sanitize::sanitize_text;
use crate::schema::MAX_MEASURE;

/// DVD capacity in MB.
pub const DVD_SIZE: FieldDescriptor = FieldDescriptor::numeric("size")
    .with_max(MAX_MEASURE)
    .with_hint("Please, provide size in MB.");

const DIMENSION_HINT: &str = "Please, provide dimensions in HxWxL format.";

/// Furniture height, first of the HxWxL dimensions.
pub const FURNITURE_HEIGHT: FieldDescriptor = FieldDescriptor::numeric("height")
    .with_max(MAX_MEASURE)
    .with_hint(DIMENSION_HINT);
/// Furniture width.
pub const FURNITURE_WIDTH: FieldDescriptor = FieldDescriptor::numeric("width")
    .with_max(MAX_MEASURE)
    .with_hint(DIMENSION_HINT);
/// Furniture length.
pub const FURNITURE_LENGTH: FieldDescriptor = FieldDescriptor::numeric("length")
    .with_max(MAX_MEASURE)
    .with_hint(DIMENSION_HINT);

/// Book weight in Kg.
pub const BOOK_WEIGHT: FieldDescriptor = FieldDescriptor::numeric("weight")
    .with_max(MAX_MEASURE)
    .with_hint("Please, provide weight in Kg.");

const DVD_FIELDS: &[FieldDescriptor] = &[DVD_SIZE];
const FURNITURE_FIELDS: &[FieldDescriptor] = &[FURNITURE_HEIGHT, FURNITURE_WIDTH, FURNITURE_LENGTH];
const BOOK_FIELDS: &[FieldDescriptor] = &[BOOK_WEIGHT];

/// A product category, selected by the `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Dvd,
    Furniture,
    Book,
}

impl Category {
    /// All supported categories, in the order they are reported to clients.
    pub const ALL: [Self; 3] = [Self::Dvd, Self::Furniture, Self::Book];

    /// Returns the discriminator string for this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dvd => "DVD",
            Self::Furniture => "Furniture",
            Self::Book => "Book",
        }
    }

    /// Returns the extension fields this category adds to the base schema.
    pub const fn fields(self) -> &'static [FieldDescriptor] {
        match self {
            Self::Dvd => DVD_FIELDS,
            Self::Furniture => FURNITURE_FIELDS,
            Self::Book => BOOK_FIELDS,
        }
    }

    /// Returns the discriminator strings of every supported category.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Matches a discriminator string exactly (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Resolves a raw discriminator value.
    ///
    /// The value goes through the text sanitizer before matching, so
    /// surrounding whitespace is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedCategory`] when the value is absent, not a string,
    /// or does not name a supported category.
    pub fn resolve(discriminator: Option<&Value>) -> Result<Self, UnsupportedCategory> {
        let sanitized = discriminator.and_then(sanitize_text);
        if let Some(category) = sanitized.as_deref().and_then(Self::from_name) {
            return Ok(category);
        }

        let offending = match discriminator {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(raw)) => raw.clone(),
            Some(other) => other.to_string(),
        };
        Err(UnsupportedCategory::new(offending))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_each_category() {
        for category in Category::ALL {
            let raw = json!(category.as_str());
            assert_eq!(Category::resolve(Some(&raw)).unwrap(), category);
        }
    }

    #[test]
    fn test_resolve_trims_discriminator() {
        assert_eq!(
            Category::resolve(Some(&json!("  DVD "))).unwrap(),
            Category::Dvd
        );
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let err = Category::resolve(Some(&json!("dvd"))).unwrap_err();
        assert_eq!(err.value, "dvd");
    }

    #[test]
    fn test_resolve_missing_discriminator() {
        let err = Category::resolve(None).unwrap_err();
        assert_eq!(err.value, "");
        assert_eq!(err.supported, Category::names());
    }

    #[test]
    fn test_resolve_non_string_discriminator() {
        let err = Category::resolve(Some(&json!(3))).unwrap_err();
        assert_eq!(err.value, "3");
    }

    #[test]
    fn test_extension_fields() {
        assert_eq!(Category::Dvd.fields().len(), 1);
        assert_eq!(Category::Furniture.fields().len(), 3);
        assert_eq!(Category::Book.fields()[0].name, "weight");
    }
}
