//! Access token acquisition
//!
//! Two flows are supported: the OAuth2 client-credentials grant used for
//! Graph, and the host's managed identity used to read Key Vault.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use graphgate_core::{ClientCredentials, DirectoryError, Result};

use crate::endpoints::{GraphEndpoints, GRAPH_SCOPE};
use crate::http::HttpClient;

const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

async fn read_token(response: reqwest::Response, flow: &str) -> Result<SecretString> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(e) => format!("{}: {}", e.error, e.error_description),
            Err(_) => format!("HTTP {} - {}", status, body),
        };
        return Err(DirectoryError::auth_error(format!(
            "{} token request failed: {}",
            flow, message
        )));
    }

    let token: TokenResponse = response.json().await.map_err(|e| {
        DirectoryError::auth_error(format!("Failed to parse {} token response: {}", flow, e))
    })?;

    Ok(SecretString::from(token.access_token))
}

/// Request a Graph access token for `credentials` using the client-credentials grant.
#[instrument(skip(http, endpoints, credentials), fields(tenant_id = %credentials.tenant_id))]
pub async fn request_client_token(
    http: &HttpClient,
    endpoints: &GraphEndpoints,
    credentials: &ClientCredentials,
) -> Result<SecretString> {
    let token_url = endpoints.token_url(&credentials.tenant_id.to_string());

    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.expose_secret()),
        ("scope", GRAPH_SCOPE),
    ];

    let response = http
        .send(http.inner().post(&token_url).form(&params))
        .await?;

    let token = read_token(response, "Client credentials").await?;
    debug!("Acquired Graph access token");
    Ok(token)
}

/// Where the host's managed identity hands out tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedIdentity {
    /// App Service / Functions identity endpoint
    AppService { endpoint: String, header: String },
    /// Instance Metadata Service
    Imds { endpoint: String },
}

impl Default for ManagedIdentity {
    fn default() -> Self {
        Self::Imds {
            endpoint: IMDS_TOKEN_ENDPOINT.to_string(),
        }
    }
}

impl ManagedIdentity {
    /// Build from the host-provided `IDENTITY_ENDPOINT` / `IDENTITY_HEADER`
    /// values, falling back to IMDS when either is missing.
    pub fn from_host(endpoint: Option<String>, header: Option<String>) -> Self {
        match (endpoint, header) {
            (Some(endpoint), Some(header)) if !endpoint.is_empty() && !header.is_empty() => {
                Self::AppService { endpoint, header }
            }
            _ => Self::default(),
        }
    }

    /// Request a token for `resource`.
    #[instrument(skip(self, http))]
    pub async fn request_token(&self, http: &HttpClient, resource: &str) -> Result<SecretString> {
        let request = match self {
            Self::AppService { endpoint, header } => http
                .inner()
                .get(endpoint)
                .query(&[("resource", resource), ("api-version", APP_SERVICE_API_VERSION)])
                .header("X-IDENTITY-HEADER", header),
            Self::Imds { endpoint } => http
                .inner()
                .get(endpoint)
                .query(&[("resource", resource), ("api-version", IMDS_API_VERSION)])
                .header("Metadata", "true"),
        };

        let response = http.send(request).await?;
        read_token(response, "Managed identity").await
    }
}
