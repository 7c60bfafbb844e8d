//! Typed product model.
//!
//! A [`Product`] holds the base fields plus the category-specific fields in a
//! tagged union ([`Details`]). Every assignment goes through the sanitizer;
//! an assignment whose input sanitizes to nothing leaves the previous value
//! in place and reports `false`.
//!
//! # Examples
//!
//! ```
//! use catalog_core::{Category, Product};
//! use serde_json::json;
//!
//! let input = json!({"sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700});
//! let product = Product::from_input(input.as_object().unwrap()).unwrap();
//!
//! assert_eq!(product.category(), Category::Dvd);
//! assert_eq!(product.sku(), Some("AB12"));
//! assert_eq!(product.id(), None);
//! assert_eq!(
//!     product.record().field_names(),
//!     vec!["id", "sku", "name", "price", "type", "size"]
//! );
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::category::{
    BOOK_WEIGHT, Category, DVD_SIZE, FURNITURE_HEIGHT, FURNITURE_LENGTH, FURNITURE_WIDTH,
};
use crate::descriptor::FieldDescriptor;
use crate::error::{CatalogError, UnsupportedCategory};
use crate::record::{FieldValue, Record, RecordField};
use crate::sanitize::{sanitize_number, sanitize_text};
use crate::schema::{self, ID_FIELD, PRICE, TYPE_FIELD};

/// DVD extension fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dvd {
    pub size: Option<Number>,
}

/// Furniture extension fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Furniture {
    pub height: Option<Number>,
    pub width: Option<Number>,
    pub length: Option<Number>,
}

/// Book extension fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub weight: Option<Number>,
}

/// Category-specific part of a product.
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    Dvd(Dvd),
    Furniture(Furniture),
    Book(Book),
}

impl Details {
    /// Returns empty details for a category.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Dvd => Self::Dvd(Dvd::default()),
            Category::Furniture => Self::Furniture(Furniture::default()),
            Category::Book => Self::Book(Book::default()),
        }
    }

    /// Returns the category these details belong to.
    pub fn category(&self) -> Category {
        match self {
            Self::Dvd(_) => Category::Dvd,
            Self::Furniture(_) => Category::Furniture,
            Self::Book(_) => Category::Book,
        }
    }
}

/// A catalog product of one resolved category.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: Option<i64>,
    sku: Option<String>,
    name: Option<String>,
    price: Option<Number>,
    details: Details,
}

impl Product {
    /// Creates a product of the given category with every field absent.
    pub fn new(category: Category) -> Self {
        Self {
            id: None,
            sku: None,
            name: None,
            price: None,
            details: Details::empty(category),
        }
    }

    /// Builds an unpersisted product from untyped input.
    ///
    /// The `type` key selects the category; every other field of that
    /// category is assigned through the sanitizer. Keys belonging to other
    /// categories, and `id`, are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedCategory`] if `type` is missing or unknown.
    pub fn from_input(input: &Map<String, Value>) -> Result<Self, UnsupportedCategory> {
        let category = Category::resolve(input.get(TYPE_FIELD))?;
        let mut product = Self::new(category);
        for field in schema::fields_for(category) {
            if let Some(raw) = input.get(field.name) {
                product.set(field.name, raw);
            }
        }
        Ok(product)
    }

    /// Rebuilds a product from a stored row.
    ///
    /// Sanitizers still apply; no validation is implied.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CorruptRow`] if the stored `type` is not a
    /// supported category.
    pub fn from_row(row: &Map<String, Value>) -> Result<Self, CatalogError> {
        let id = row.get(ID_FIELD).and_then(Value::as_i64);
        let mut product = Self::from_input(row).map_err(|err| CatalogError::CorruptRow {
            id,
            reason: err.to_string(),
        })?;
        product.id = id;
        Ok(product)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn price(&self) -> Option<&Number> {
        self.price.as_ref()
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// Returns `true` once the product has a stored identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn set_sku(&mut self, raw: &Value) -> bool {
        assign(&mut self.sku, sanitize_text(raw))
    }

    pub fn set_name(&mut self, raw: &Value) -> bool {
        assign(&mut self.name, sanitize_text(raw))
    }

    pub fn set_price(&mut self, raw: &Value) -> bool {
        assign_number(&mut self.price, raw, &PRICE)
    }

    /// Assigns a field by name.
    ///
    /// Returns `None` if the field is not settable on this product's
    /// category (including `id` and `type`), otherwise whether the value was
    /// accepted.
    pub fn set(&mut self, field: &str, raw: &Value) -> Option<bool> {
        match field {
            "sku" => return Some(self.set_sku(raw)),
            "name" => return Some(self.set_name(raw)),
            "price" => return Some(self.set_price(raw)),
            _ => {}
        }
        let assigned = match (field, &mut self.details) {
            ("size", Details::Dvd(dvd)) => assign_number(&mut dvd.size, raw, &DVD_SIZE),
            ("height", Details::Furniture(f)) => {
                assign_number(&mut f.height, raw, &FURNITURE_HEIGHT)
            }
            ("width", Details::Furniture(f)) => assign_number(&mut f.width, raw, &FURNITURE_WIDTH),
            ("length", Details::Furniture(f)) => {
                assign_number(&mut f.length, raw, &FURNITURE_LENGTH)
            }
            ("weight", Details::Book(book)) => assign_number(&mut book.weight, raw, &BOOK_WEIGHT),
            _ => return None,
        };
        Some(assigned)
    }

    /// Returns the current value of a field by name.
    pub fn value(&self, field: &str) -> Option<FieldValue> {
        let number = |n: &Option<Number>| n.clone().map(FieldValue::Number);
        match (field, &self.details) {
            (ID_FIELD, _) => self.id.map(|id| FieldValue::Number(id.into())),
            ("sku", _) => self.sku.clone().map(FieldValue::Text),
            ("name", _) => self.name.clone().map(FieldValue::Text),
            ("price", _) => number(&self.price),
            (TYPE_FIELD, details) => Some(FieldValue::Text(details.category().as_str().into())),
            ("size", Details::Dvd(dvd)) => number(&dvd.size),
            ("height", Details::Furniture(f)) => number(&f.height),
            ("width", Details::Furniture(f)) => number(&f.width),
            ("length", Details::Furniture(f)) => number(&f.length),
            ("weight", Details::Book(book)) => number(&book.weight),
            _ => None,
        }
    }

    /// Returns the generic record view: base fields then category fields.
    pub fn record(&self) -> Record {
        let fields = schema::fields_for(self.category())
            .map(|descriptor| RecordField {
                descriptor,
                value: self.value(descriptor.name),
            })
            .collect();
        Record::new(fields)
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}

fn assign<T>(slot: &mut Option<T>, sanitized: Option<T>) -> bool {
    match sanitized {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn assign_number(slot: &mut Option<Number>, raw: &Value, descriptor: &FieldDescriptor) -> bool {
    assign(slot, sanitize_number(raw, descriptor.allow_negative))
}
