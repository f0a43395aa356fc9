//! How operation outcomes become HTTP responses
//!
//! List operations and lookups report failures differently, so each family
//! gets its own reply type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use graphgate_core::{Collection, DirectoryError, ErrorClass, Result};

use crate::dto::ErrorBody;

/// Outcome of a list operation.
///
/// Validation failures are `400` text; every other failure is logged and
/// answered with `200` and an empty collection.
#[derive(Debug)]
pub enum ListReply<T> {
    Items(Collection<T>),
    Failed(DirectoryError),
}

impl<T> From<Result<Vec<T>>> for ListReply<T> {
    fn from(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => Self::Items(Collection::new(items)),
            Err(e) => Self::Failed(e),
        }
    }
}

impl<T: Serialize> IntoResponse for ListReply<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Items(collection) => (StatusCode::OK, Json(collection)).into_response(),
            Self::Failed(e) => match e.class() {
                ErrorClass::Validation => {
                    warn!("Rejected request: {}", e);
                    (StatusCode::BAD_REQUEST, e.to_string()).into_response()
                }
                ErrorClass::NotFound | ErrorClass::Upstream => {
                    error!("List operation failed: {}", e);
                    (StatusCode::OK, Json(Collection::<T>::default())).into_response()
                }
            },
        }
    }
}

/// Outcome of a single-entity lookup.
///
/// Validation failures are `400` text, zero or ambiguous matches `404` text,
/// and everything else a logged `500` with an [`ErrorBody`].
#[derive(Debug)]
pub enum LookupReply<T> {
    Found(T),
    Failed(DirectoryError),
}

impl<T> From<Result<T>> for LookupReply<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(entity) => Self::Found(entity),
            Err(e) => Self::Failed(e),
        }
    }
}

impl<T: Serialize> IntoResponse for LookupReply<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Found(entity) => (StatusCode::OK, Json(entity)).into_response(),
            Self::Failed(e) => match e.class() {
                ErrorClass::Validation => {
                    warn!("Rejected request: {}", e);
                    (StatusCode::BAD_REQUEST, e.to_string()).into_response()
                }
                ErrorClass::NotFound => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
                ErrorClass::Upstream => {
                    error!("Lookup failed: {}", e);
                    let status = StatusCode::INTERNAL_SERVER_ERROR;
                    (
                        status,
                        Json(ErrorBody {
                            status_code: status.as_u16(),
                            message: e.to_string(),
                        }),
                    )
                        .into_response()
                }
            },
        }
    }
}
