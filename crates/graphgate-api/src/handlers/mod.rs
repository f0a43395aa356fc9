//! API request handlers

pub mod groups;
pub mod health;
pub mod users;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use graphgate_core::{DirectoryError, Result};

pub use health::liveness;

/// Decode a JSON request body. Bodies are read raw so that a malformed one is
/// reported through the operation's reply policy rather than axum's rejection.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| DirectoryError::malformed_request(e.to_string()))
}
