//! # Graphgate Graph
//!
//! Production collaborators for the directory proxy:
//!
//! - [`GraphClient`] / [`GraphClientFactory`]: Microsoft Graph REST queries
//!   authenticated with the OAuth2 client-credentials flow
//! - [`KeyVaultSecretProvider`]: client secret read from Azure Key Vault using
//!   the host's managed identity
//! - [`StaticSecretProvider`]: client secret supplied by local configuration

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod http;
pub mod secrets;

pub use auth::{request_client_token, ManagedIdentity};
pub use client::{GraphClient, GraphClientFactory};
pub use endpoints::GraphEndpoints;
pub use http::HttpClient;
pub use secrets::{KeyVaultSecretProvider, StaticSecretProvider};
