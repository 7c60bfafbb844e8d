//! Schema-driven product model for the catalog backend.
//!
//! This crate holds everything between raw client input and the row store:
//!
//! - [`FieldDescriptor`]: immutable per-field metadata (kind, requiredness,
//!   bounds, sign policy, hint), declared as `const` tables in [`schema`].
//! - [`Category`]: the closed set of product variants; resolves the `type`
//!   discriminator and supplies each variant's extension fields.
//! - [`sanitize_text`] / [`sanitize_number`]: canonicalize untyped input.
//! - [`Product`]: typed model with a tagged-union [`Details`] part, and its
//!   generic [`Record`] view used by validation and serialization.
//! - [`validate`] / [`validate_with_store`]: collect every field violation
//!   into one [`ErrorMap`], plus the uniqueness check on creation.
//! - [`to_wire`]: render a record with numbers as numbers, in schema order.
//! - [`RowStore`]: the persistence contract a backend implements.
//! - [`Catalog`]: create/update/list/delete orchestration and the
//!   [`Response`] mapping of the error taxonomy.
//!
//! # Example
//!
//! ```
//! use catalog_core::*;
//! use serde_json::json;
//!
//! let input = json!({"sku": "AB12", "name": "Widget", "price": -9.99, "type": "DVD", "size": 700});
//! let product = Product::from_input(input.as_object().unwrap()).unwrap();
//! let record = product.record();
//!
//! assert!(validate(&record).is_none());
//! let wire = to_wire(&record);
//! assert_eq!(wire["price"], json!(9.99));
//! assert_eq!(wire["type"], json!("DVD"));
//! ```

mod catalog;
mod category;
mod descriptor;
mod error;
mod product;
mod record;
mod response;
mod sanitize;
pub mod schema;
mod serialize;
mod store;
mod validate;

pub use catalog::{Catalog, parse_ids};
pub use category::Category;
pub use descriptor::{FieldDescriptor, FieldKind};
pub use error::{CatalogError, Result, StorageError, UnsupportedCategory};
pub use product::{Book, Details, Dvd, Furniture, Product};
pub use record::{FieldValue, Record, RecordField};
pub use response::Response;
pub use sanitize::{sanitize, sanitize_number, sanitize_text};
pub use serialize::to_wire;
pub use store::{Row, RowStore};
pub use validate::{ErrorMap, validate, validate_with_store};
