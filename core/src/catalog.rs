//! Product lifecycle orchestration.
//!
//! [`Catalog`] ties the model to a [`RowStore`] handed in by the caller:
//! resolve input to a [`Product`], validate, persist, and render. A product
//! without an id is new; saving assigns one. Saving a product that has an id
//! updates it instead, skipping the uniqueness lookup. Deleting consumes the
//! product.
//!
//! The `handle_*` methods are the request boundary: they accept raw JSON
//! input and always return a [`Response`].
//!
//! # Examples
//!
//! ```no_run
//! # fn demo<S: catalog_core::RowStore>(store: S) {
//! use catalog_core::Catalog;
//! use serde_json::json;
//!
//! let catalog = Catalog::new(store);
//! let response = catalog.handle_create(&json!({
//!     "sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700
//! }));
//! assert_eq!(response.status, 201);
//! # }
//! ```

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::product::Product;
use crate::response::Response;
use crate::schema::{ID_FIELD, TYPE_FIELD};
use crate::serialize::to_wire;
use crate::store::{Row, RowStore};
use crate::validate::{ErrorMap, validate_with_store};

/// Catalog service over a row store.
pub struct Catalog<S> {
    store: S,
}

impl<S: RowStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads products matching an equality filter.
    pub fn find(&self, filter: &Row, limit: Option<usize>, descending: bool) -> Result<Vec<Product>> {
        let rows = self.store.select(filter, limit, descending)?;
        debug!(rows = rows.len(), "loaded product rows");
        rows.iter().map(Product::from_row).collect()
    }

    /// Loads every product.
    pub fn list(&self) -> Result<Vec<Product>> {
        self.find(&Row::new(), None, false)
    }

    /// Loads one product by id.
    pub fn get(&self, id: i64) -> Result<Option<Product>> {
        let mut filter = Row::new();
        filter.insert(ID_FIELD.to_string(), json!(id));
        Ok(self.find(&filter, Some(1), false)?.into_iter().next())
    }

    /// Validates a product, including the uniqueness lookup for new products.
    pub fn validate(&self, product: &Product) -> Result<Option<ErrorMap>> {
        Ok(validate_with_store(&product.record(), &self.store)?)
    }

    /// Validates and persists a product.
    ///
    /// New products are inserted and receive their id; persisted products
    /// are overwritten by id.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] with every violation, [`CatalogError::NotFound`]
    /// if a persisted product's row is gone, or [`CatalogError::Storage`].
    pub fn save(&self, product: &mut Product) -> Result<()> {
        if let Some(errors) = self.validate(product)? {
            return Err(CatalogError::Validation(errors));
        }

        let data = product.record().to_row();
        match product.id() {
            Some(id) => {
                if self.store.update(id, &data)? == 0 {
                    return Err(CatalogError::NotFound(id));
                }
                info!(id, "updated product");
            }
            None => {
                let id = self.store.insert(&data)?;
                product.set_id(id);
                info!(id, sku = product.sku(), category = %product.category(), "created product");
            }
        }
        Ok(())
    }

    /// Deletes a persisted product.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotPersisted`] if the product was never saved,
    /// [`CatalogError::NotFound`] if its row is already gone.
    pub fn delete(&self, product: Product) -> Result<()> {
        let id = product.id().ok_or(CatalogError::NotPersisted)?;
        if self.store.delete(id)? == 0 {
            return Err(CatalogError::NotFound(id));
        }
        info!(id, "deleted product");
        Ok(())
    }

    /// Deletes products by id in one atomic batch, skipping missing ids.
    pub fn delete_many(&self, ids: &[i64]) -> Result<usize> {
        let removed = self.store.delete_all(ids)?;
        info!(requested = ids.len(), removed, "deleted products");
        Ok(removed)
    }

    /// Builds, validates and inserts a product from raw input.
    pub fn create(&self, input: &Value) -> Result<Product> {
        let attributes = expect_object(input)?;
        let mut product = Product::from_input(attributes)?;
        self.save(&mut product)?;
        Ok(product)
    }

    /// Applies a partial update to a stored product.
    ///
    /// `id` is required; `type` and `sku` cannot be changed, though a `null`
    /// value for either counts as absent. Keys that are not fields of the
    /// product's category are ignored, and values that do not sanitize keep
    /// the stored value.
    pub fn update(&self, input: &Value) -> Result<Product> {
        let attributes = expect_object(input)?;
        let id = attributes
            .get(ID_FIELD)
            .and_then(Value::as_i64)
            .ok_or_else(|| CatalogError::InvalidInput("Product's ID of type 'int' is required.".into()))?;
        let present = |key: &str| attributes.get(key).is_some_and(|v| !v.is_null());
        if present(TYPE_FIELD) || present("sku") {
            return Err(CatalogError::InvalidInput(
                "Changing product's type or SKU is currently not supported.".into(),
            ));
        }

        let mut product = self.get(id)?.ok_or(CatalogError::NotFound(id))?;
        for (field, raw) in attributes.iter().filter(|(field, _)| *field != ID_FIELD) {
            if product.set(field, raw).is_none() {
                debug!(id, field = %field, "ignoring field not in product schema");
            }
        }
        self.save(&mut product)?;
        Ok(product)
    }

    /// Lists all products, each rendered with only its category's fields.
    pub fn handle_list(&self) -> Response {
        match self.list() {
            Ok(products) => Response::ok(Value::Array(
                products
                    .iter()
                    .map(|p| Value::Object(to_wire(&p.record())))
                    .collect(),
            )),
            Err(err) => Response::from_error(&err),
        }
    }

    /// Creates a product; 201 with the stored product, or 400 with the error map.
    pub fn handle_create(&self, input: &Value) -> Response {
        match self.create(input) {
            Ok(product) => Response::created(Value::Object(to_wire(&product.record()))),
            Err(err) => Response::from_error(&err),
        }
    }

    /// Updates a product; 200 with the stored product.
    pub fn handle_update(&self, input: &Value) -> Response {
        match self.update(input) {
            Ok(product) => Response::ok(Value::Object(to_wire(&product.record()))),
            Err(err) => Response::from_error(&err),
        }
    }

    /// Deletes the products whose ids are listed in a JSON array; 204 on success.
    pub fn handle_delete(&self, input: &Value) -> Response {
        match parse_ids(input).and_then(|ids| self.delete_many(&ids)) {
            Ok(_) => Response::no_content(),
            Err(err) => Response::from_error(&err),
        }
    }
}

/// Parses a JSON array of integer ids.
///
/// # Errors
///
/// [`CatalogError::InvalidInput`] if the input is not an array or any
/// element is not an integer.
pub fn parse_ids(input: &Value) -> Result<Vec<i64>> {
    let invalid = || CatalogError::InvalidInput("Input must be an array of integers".into());
    input
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_i64().ok_or_else(invalid))
        .collect()
}

fn expect_object(input: &Value) -> Result<&Map<String, Value>> {
    input
        .as_object()
        .ok_or_else(|| CatalogError::InvalidInput("Input must be a valid JSON object".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_accepts_integers() {
        assert_eq!(parse_ids(&json!([1, 2, 9999])).unwrap(), vec![1, 2, 9999]);
        assert_eq!(parse_ids(&json!([])).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_parse_ids_rejects_other_shapes() {
        for input in [json!({"ids": [1]}), json!([1, "2"]), json!([1.5]), json!(3), json!(null)] {
            let err = parse_ids(&input).unwrap_err();
            assert_eq!(err.status(), 400);
            assert_eq!(err.to_string(), "Input must be an array of integers");
        }
    }

    #[test]
    fn test_expect_object() {
        assert!(expect_object(&json!({})).is_ok());
        let err = expect_object(&json!([1])).unwrap_err();
        assert_eq!(err.to_string(), "Input must be a valid JSON object");
    }
}
