//! Generic, descriptor-annotated view of one entity.
//!
//! A [`Record`] pairs every field of a resolved variant with its descriptor
//! and current value. Validation and serialization walk records without
//! knowing which category they came from. Records are built from a
//! [`Product`](crate::Product) and always contain the full field set of its
//! category, including fields whose value is absent.

use serde_json::{Number, Value};

use crate::descriptor::FieldDescriptor;
use crate::schema::ID_FIELD;
use crate::store::Row;

/// A sanitized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Number),
}

impl FieldValue {
    /// Converts the value to JSON, keeping numbers as numbers.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }

    /// Returns the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Returns the numeric value as `f64`, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(_) => None,
        }
    }
}

/// One field of a record: descriptor plus optional value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub descriptor: &'static FieldDescriptor,
    pub value: Option<FieldValue>,
}

impl RecordField {
    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }
}

/// Ordered field/value pairs for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<RecordField>,
}

impl Record {
    /// Builds a record from fields in declaration order.
    pub fn new(fields: Vec<RecordField>) -> Self {
        Self { fields }
    }

    /// Returns all fields in declaration order.
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Returns the names of all fields in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(RecordField::name).collect()
    }

    /// Finds a field by name.
    pub fn get(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the value of a field, or `None` if it is absent or unknown.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).and_then(|f| f.value.as_ref())
    }

    /// Returns the stored identifier, if the record has been persisted.
    pub fn id(&self) -> Option<i64> {
        match self.value(ID_FIELD)? {
            FieldValue::Number(n) => n.as_i64(),
            FieldValue::Text(_) => None,
        }
    }

    /// Returns the write set for storage: every field except `id`, with
    /// absent values as `null`.
    pub fn to_row(&self) -> Row {
        self.fields
            .iter()
            .filter(|f| f.name() != ID_FIELD)
            .map(|f| {
                let value = f.value.as_ref().map_or(Value::Null, FieldValue::to_json);
                (f.name().to_string(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{ID, NAME, PRICE};

    fn sample() -> Record {
        Record::new(vec![
            RecordField {
                descriptor: &ID,
                value: Some(FieldValue::Number(Number::from(7))),
            },
            RecordField {
                descriptor: &NAME,
                value: Some(FieldValue::Text("Widget".into())),
            },
            RecordField {
                descriptor: &PRICE,
                value: None,
            },
        ])
    }

    #[test]
    fn test_id_is_read_from_id_field() {
        assert_eq!(sample().id(), Some(7));
    }

    #[test]
    fn test_to_row_excludes_id_and_nulls_absent_values() {
        let row = sample().to_row();
        assert!(!row.contains_key("id"));
        assert_eq!(row["name"], json!("Widget"));
        assert_eq!(row["price"], Value::Null);
    }

    #[test]
    fn test_value_lookup() {
        let record = sample();
        assert_eq!(record.value("name").and_then(FieldValue::as_text), Some("Widget"));
        assert!(record.value("price").is_none());
        assert!(record.get("missing").is_none());
        assert_eq!(record.field_names(), vec!["id", "name", "price"]);
    }
}
