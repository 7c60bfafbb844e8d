//! Status-plus-body results for the request boundary.
//!
//! The catalog does not speak HTTP itself; a [`Response`] carries the status
//! code and JSON body a transport layer should emit. Errors are turned into
//! responses in exactly one place, [`Response::from_error`].

use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn created(body: Value) -> Self {
        Self {
            status: 201,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// Maps an error to its response, logging server-side failures with
    /// their full source chain.
    pub fn from_error(err: &CatalogError) -> Self {
        if err.is_client_error() {
            warn!(status = err.status(), "rejected request: {err}");
        } else {
            error!(error = ?err, "request failed");
        }
        Self {
            status: err.status(),
            body: Some(err.body()),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<CatalogError> for Response {
    fn from(err: CatalogError) -> Self {
        Self::from_error(&err)
    }
}
