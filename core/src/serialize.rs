//! Wire serialization of records.
//!
//! Fields are emitted in declaration order (`id` first, base fields, then
//! category fields). Numeric fields are bare JSON numbers, with absent
//! numbers written as `0`; text fields are strings, with absent text written
//! as `""`. No validation happens here.
//!
//! # Examples
//!
//! ```
//! use catalog_core::{Product, to_wire};
//! use serde_json::json;
//!
//! let input = json!({"sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700});
//! let product = Product::from_input(input.as_object().unwrap()).unwrap();
//!
//! let wire = serde_json::to_string(&to_wire(&product.record())).unwrap();
//! assert_eq!(
//!     wire,
//!     r#"{"id":0,"sku":"AB12","name":"Widget","price":9.99,"type":"DVD","size":700}"#
//! );
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::descriptor::FieldKind;
use crate::record::{FieldValue, Record, RecordField};

/// Renders a record as an ordered JSON object.
pub fn to_wire(record: &Record) -> Map<String, Value> {
    record
        .fields()
        .iter()
        .map(|field| (field.name().to_string(), wire_value(field)))
        .collect()
}

fn wire_value(field: &RecordField) -> Value {
    match (&field.value, field.descriptor.kind) {
        (Some(FieldValue::Number(n)), _) => Value::Number(n.clone()),
        (Some(FieldValue::Text(s)), _) => Value::String(s.clone()),
        (None, FieldKind::Numeric) => Value::from(0),
        (None, FieldKind::Text) => Value::String(String::new()),
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields().len()))?;
        for field in self.fields() {
            map.serialize_entry(field.name(), &wire_value(field))?;
        }
        map.end()
    }
}
