//! Upstream endpoint configuration

use serde::Deserialize;

/// Scope requested for Graph access tokens
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Resource requested for Key Vault access tokens
pub const KEY_VAULT_RESOURCE: &str = "https://vault.azure.net";

pub const KEY_VAULT_API_VERSION: &str = "7.4";

/// Base URLs of the identity platform and the Graph API.
///
/// Both default to the public cloud; tests point them at a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphEndpoints {
    pub authority_host: String,
    pub graph_base_url: String,
}

impl Default for GraphEndpoints {
    fn default() -> Self {
        Self {
            authority_host: "https://login.microsoftonline.com".to_string(),
            graph_base_url: "https://graph.microsoft.com/v1.0".to_string(),
        }
    }
}

impl GraphEndpoints {
    pub fn new(authority_host: impl Into<String>, graph_base_url: impl Into<String>) -> Self {
        Self {
            authority_host: authority_host.into(),
            graph_base_url: graph_base_url.into(),
        }
    }

    /// `{authority_host}/{tenant}/oauth2/v2.0/token`
    pub fn token_url(&self, tenant: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            tenant
        )
    }

    pub fn graph_url(&self, path: &str) -> String {
        format!("{}{}", self.graph_base_url.trim_end_matches('/'), path)
    }
}
