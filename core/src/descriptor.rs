//! Per-field schema metadata.
//!
//! A [`FieldDescriptor`] is declared once per field as a `const` and never
//! mutated afterwards. Builder methods are `const fn` so the whole product
//! schema can live in static tables (see [`crate::schema`]).
//!
//! # Examples
//!
//! ```
//! use catalog_core::{FieldDescriptor, FieldKind};
//!
//! const SIZE: FieldDescriptor = FieldDescriptor::numeric("size")
//!     .with_max(1e8)
//!     .with_hint("Please, provide size in MB.");
//!
//! assert_eq!(SIZE.kind, FieldKind::Numeric);
//! assert!(SIZE.required);
//! assert!(!SIZE.allow_negative);
//! ```

use std::fmt;

use serde::Serialize;

/// Storage and wire kind of a field.
///
/// Text fields travel as quoted strings, numeric fields as bare JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    /// Free-form text.
    #[serde(rename = "text")]
    Text,
    /// Integer or floating point number.
    #[serde(rename = "number")]
    Numeric,
}

impl FieldKind {
    /// Returns the lowercase name used in messages (`"text"` / `"number"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "number",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable metadata about one field: kind, requiredness and bounds.
///
/// `max_length` only applies to [`FieldKind::Text`]; `min`, `max` and
/// `allow_negative` only apply to [`FieldKind::Numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field (and column) name.
    pub name: &'static str,
    /// Text or numeric.
    pub kind: FieldKind,
    /// Whether an absent value is a validation error.
    pub required: bool,
    /// Whether the value must not already exist in storage on creation.
    pub unique: bool,
    /// Maximum text length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Inclusive numeric lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive numeric upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Keep the sign of numeric input; otherwise the absolute value is stored.
    pub allow_negative: bool,
    /// Human-readable hint appended to "required" messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl FieldDescriptor {
    const fn base(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            unique: false,
            max_length: None,
            min: None,
            max: None,
            allow_negative: false,
            hint: None,
        }
    }

    /// Creates a required text field.
    pub const fn text(name: &'static str) -> Self {
        Self::base(name, FieldKind::Text)
    }

    /// Creates a required, unsigned numeric field.
    pub const fn numeric(name: &'static str) -> Self {
        Self::base(name, FieldKind::Numeric)
    }

    /// Marks the field as optional.
    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    /// Marks the field as unique across stored records.
    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    /// Sets the maximum text length.
    pub const fn with_max_length(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    /// Sets the numeric lower bound.
    pub const fn with_min(self, min: f64) -> Self {
        Self {
            min: Some(min),
            ..self
        }
    }

    /// Sets the numeric upper bound.
    pub const fn with_max(self, max: f64) -> Self {
        Self {
            max: Some(max),
            ..self
        }
    }

    /// Keeps negative numbers instead of taking the absolute value.
    pub const fn signed(self) -> Self {
        Self {
            allow_negative: true,
            ..self
        }
    }

    /// Attaches a hint shown when the field is missing.
    pub const fn with_hint(self, hint: &'static str) -> Self {
        Self {
            hint: Some(hint),
            ..self
        }
    }
}
