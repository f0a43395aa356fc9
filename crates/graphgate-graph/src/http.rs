//! Shared HTTP plumbing for the Graph and Key Vault collaborators

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use graphgate_core::{DirectoryError, Result};

/// Upper bound on every upstream request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client wrapper; requests are sent once, never retried.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DirectoryError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a request, turning transport failures into `Http` errors.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| DirectoryError::http_error(e.to_string()))
    }
}

/// `{"error": {"code": ..., "message": ...}}` as returned by Graph and Key Vault
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Pass successful responses through; map the rest to `GraphApi` errors,
/// using the OData error body when there is one.
pub async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Upstream returned {}: {}", status, body);

    match serde_json::from_str::<ODataError>(&body) {
        Ok(odata) => Err(DirectoryError::GraphApi {
            code: odata.error.code,
            message: odata.error.message,
        }),
        Err(_) => Err(DirectoryError::GraphApi {
            code: status.as_u16().to_string(),
            message: body,
        }),
    }
}

/// Decode a JSON body, reporting decode failures as `Http` errors.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| DirectoryError::http_error(format!("Failed to parse response: {}", e)))
}
