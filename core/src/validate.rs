//! Record validation.
//!
//! Every field is checked against its descriptor and every violation is
//! collected into one [`ErrorMap`]; validation never stops at the first bad
//! field. Each call returns a fresh result.
//!
//! Per field, in declaration order:
//!
//! 1. absent value: error if required, otherwise no further checks
//! 2. text: length bound
//! 3. numeric: upper bound, else lower bound
//!
//! Uniqueness needs a storage lookup and only runs for records without an
//! id, see [`validate_with_store`].
//!
//! # Examples
//!
//! ```
//! use catalog_core::{Product, validate};
//! use serde_json::json;
//!
//! let input = json!({"sku": "AB12", "type": "DVD", "size": 700});
//! let product = Product::from_input(input.as_object().unwrap()).unwrap();
//!
//! let errors = validate(&product.record()).unwrap();
//! assert_eq!(errors.fields(), vec!["name", "price"]);
//! ```

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::descriptor::FieldKind;
use crate::error::StorageError;
use crate::record::{FieldValue, Record, RecordField};
use crate::schema::ID_FIELD;
use crate::store::{Row, RowStore};

/// Field-name keyed validation messages, in the order they were found.
///
/// Inserting a second message for the same field replaces the first one in
/// place. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, String)>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((field, message)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the fields with errors, in insertion order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|(f, _)| f.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Returns `None` when there are no errors.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Validates every field of a record against its descriptor.
///
/// Returns `None` when the record is valid. The `id` field is never checked.
pub fn validate(record: &Record) -> Option<ErrorMap> {
    check_fields(record).into_option()
}

/// Validates a record and, for records without an id, checks unique fields
/// against storage.
///
/// Uniqueness violations are added to the same map as field violations, so
/// one call reports everything.
///
/// # Errors
///
/// Propagates [`StorageError`] from the uniqueness lookup.
pub fn validate_with_store<S: RowStore + ?Sized>(
    record: &Record,
    store: &S,
) -> Result<Option<ErrorMap>, StorageError> {
    let mut errors = check_fields(record);

    if record.id().is_none() {
        for field in record.fields().iter().filter(|f| f.descriptor.unique) {
            let Some(value) = &field.value else {
                continue;
            };
            let mut filter = Row::new();
            filter.insert(field.name().to_string(), value.to_json());
            if !store.select(&filter, Some(1), false)?.is_empty() {
                errors.insert(field.name(), duplicate_message(field.name(), value));
            }
        }
    }

    if !errors.is_empty() {
        debug!(fields = ?errors.fields(), "record failed validation");
    }
    Ok(errors.into_option())
}

fn check_fields(record: &Record) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in record.fields() {
        if field.name() == ID_FIELD {
            continue;
        }
        if let Some(message) = check_field(field) {
            errors.insert(field.name(), message);
        }
    }
    errors
}

fn check_field(field: &RecordField) -> Option<String> {
    let descriptor = field.descriptor;
    let name = descriptor.name;

    let Some(value) = &field.value else {
        if !descriptor.required {
            return None;
        }
        let mut message = format!("Field '{name}' of type '{}' is required.", descriptor.kind);
        if let Some(hint) = descriptor.hint {
            message.push(' ');
            message.push_str(hint);
        }
        return Some(message);
    };

    match (descriptor.kind, value) {
        (FieldKind::Text, FieldValue::Text(text)) => {
            let max_length = descriptor.max_length?;
            (text.chars().count() > max_length)
                .then(|| format!("Field '{name}' should be less than {max_length} characters long."))
        }
        (FieldKind::Numeric, FieldValue::Number(n)) => {
            let n = n.as_f64()?;
            if let Some(max) = descriptor.max.filter(|max| n > *max) {
                return Some(format!("Field '{name}' should be less than {max}."));
            }
            descriptor
                .min
                .filter(|min| n < *min)
                .map(|min| format!("Field '{name}' should be more than {min}."))
        }
        _ => Some(format!(
            "Field '{name}' should be of type '{}'.",
            descriptor.kind
        )),
    }
}

fn duplicate_message(field: &str, value: &FieldValue) -> String {
    let shown = match value.to_json() {
        Value::String(s) => s,
        other => other.to_string(),
    };
    format!("{} '{shown}' is already in the database", field.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;
    use crate::{Category, Product};

    fn product(value: Value) -> Product {
        let input: Map<String, Value> = value.as_object().cloned().unwrap();
        Product::from_input(&input).unwrap()
    }

    #[test]
    fn test_valid_dvd_has_no_errors() {
        let p = product(json!({"sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700}));
        assert_eq!(validate(&p.record()), None);
    }

    #[test]
    fn test_collects_all_missing_fields() {
        let p = product(json!({"sku": "AB12", "type": "DVD", "size": 700}));
        let errors = validate(&p.record()).unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("name"),
            Some("Field 'name' of type 'text' is required.")
        );
        assert_eq!(
            errors.get("price"),
            Some("Field 'price' of type 'number' is required.")
        );
    }

    #[test]
    fn test_required_message_includes_hint() {
        let p = product(json!({"sku": "AB12", "name": "Disc", "price": 1, "type": "DVD"}));
        let errors = validate(&p.record()).unwrap();
        assert_eq!(
            errors.get("size"),
            Some("Field 'size' of type 'number' is required. Please, provide size in MB.")
        );
    }

    #[test]
    fn test_text_length_bound() {
        let p = product(json!({
            "sku": "X".repeat(65), "name": "Disc", "price": 1, "type": "DVD", "size": 1
        }));
        let errors = validate(&p.record()).unwrap();
        assert_eq!(
            errors.get("sku"),
            Some("Field 'sku' should be less than 64 characters long.")
        );
    }

    #[test]
    fn test_numeric_upper_bound() {
        let p = product(json!({
            "sku": "B1", "name": "Heavy", "price": 1, "type": "Book", "weight": 1e9
        }));
        let errors = validate(&p.record()).unwrap();
        assert_eq!(
            errors.get("weight"),
            Some("Field 'weight' should be less than 100000000.")
        );
    }

    #[test]
    fn test_numeric_lower_bound() {
        use crate::descriptor::FieldDescriptor;
        static DELTA: FieldDescriptor = FieldDescriptor::numeric("delta").signed().with_min(-1.0);
        let record = Record::new(vec![RecordField {
            descriptor: &DELTA,
            value: Some(FieldValue::Number((-3).into())),
        }]);
        let errors = validate(&record).unwrap();
        assert_eq!(errors.get("delta"), Some("Field 'delta' should be more than -1."));
    }

    #[test]
    fn test_optional_absent_field_is_skipped() {
        use crate::descriptor::FieldDescriptor;
        static NOTE: FieldDescriptor = FieldDescriptor::text("note").optional().with_max_length(1);
        let record = Record::new(vec![RecordField {
            descriptor: &NOTE,
            value: None,
        }]);
        assert_eq!(validate(&record), None);
    }

    #[test]
    fn test_furniture_missing_length_only() {
        let p = product(json!({
            "sku": "F1", "name": "Chair", "price": 40, "type": "Furniture",
            "height": 90, "width": 45
        }));
        let errors = validate(&p.record()).unwrap();
        assert_eq!(errors.fields(), vec!["length"]);
    }

    #[test]
    fn test_id_is_never_required() {
        let p = Product::new(Category::Book);
        let errors = validate(&p.record()).unwrap();
        assert!(!errors.contains("id"));
        assert!(!errors.contains("type"));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let p = product(json!({"type": "Book"}));
        let record = p.record();
        assert_eq!(validate(&record), validate(&record));
    }

    #[test]
    fn test_error_map_insert_replaces_in_place() {
        let mut errors = ErrorMap::new();
        errors.insert("sku", "first");
        errors.insert("name", "second");
        errors.insert("sku", "third");
        assert_eq!(errors.fields(), vec!["sku", "name"]);
        assert_eq!(errors.get("sku"), Some("third"));
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"sku":"third","name":"second"}"#
        );
        assert_eq!(errors.to_string(), "sku: third; name: second");
    }
}
