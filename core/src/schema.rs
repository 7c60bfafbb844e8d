//! Static schema registry for the product model.
//!
//! The base product schema is shared by every category; each
//! [`Category`](crate::Category) appends its own extension fields. Field
//! order here is the declaration order used by validation and serialization.

use crate::category::Category;
use crate::descriptor::FieldDescriptor;

/// Name of the identifier field.
pub const ID_FIELD: &str = "id";

/// Name of the discriminator field.
pub const TYPE_FIELD: &str = "type";

/// Upper bound for prices and physical measurements.
pub const MAX_MEASURE: f64 = 1e8;

/// Store-assigned identifier; absent until the product is saved.
pub const ID: FieldDescriptor = FieldDescriptor::numeric(ID_FIELD).optional();
/// Stock keeping unit, unique across the catalog.
pub const SKU: FieldDescriptor = FieldDescriptor::text("sku").unique().with_max_length(64);
/// Display name.
pub const NAME: FieldDescriptor = FieldDescriptor::text("name").with_max_length(255);
/// Price, made absolute on input.
pub const PRICE: FieldDescriptor = FieldDescriptor::numeric("price").with_max(MAX_MEASURE);
/// Category discriminator (`DVD`, `Furniture` or `Book`).
pub const TYPE: FieldDescriptor = FieldDescriptor::text(TYPE_FIELD);

/// Fields common to all products, `id` first.
pub const BASE_FIELDS: &[FieldDescriptor] = &[ID, SKU, NAME, PRICE, TYPE];

/// Iterates the full field set of a category: base fields, then extension fields.
pub fn fields_for(category: Category) -> impl Iterator<Item = &'static FieldDescriptor> {
    BASE_FIELDS.iter().chain(category.fields())
}

/// Returns every distinct field across all categories, in declaration order.
///
/// Used to derive the storage layout, which holds all categories in one table.
pub fn all_fields() -> Vec<&'static FieldDescriptor> {
    let mut fields: Vec<&'static FieldDescriptor> = BASE_FIELDS.iter().collect();
    for category in Category::ALL {
        for field in category.fields() {
            if !fields.iter().any(|f| f.name == field.name) {
                fields.push(field);
            }
        }
    }
    fields
}

/// Looks up a descriptor by name within a category's field set.
pub fn find_field(category: Category, name: &str) -> Option<&'static FieldDescriptor> {
    fields_for(category).find(|f| f.name == name)
}
