//! Directory access configuration

use serde::Deserialize;

use crate::error::{DirectoryError, Result};

/// Application registration and secret location used to reach the directory.
///
/// Read once at startup and handed to the secret provider and the client
/// factory at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DirectoryConfig {
    /// Application (client) id registered in each tenant
    #[serde(default)]
    pub client_id: String,
    /// Key Vault holding the client secret
    #[serde(default)]
    pub vault_name: String,
    /// Name of the client secret inside the vault
    #[serde(default)]
    pub secret_name: String,
}

impl DirectoryConfig {
    pub fn new(
        client_id: impl Into<String>,
        vault_name: impl Into<String>,
        secret_name: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            vault_name: vault_name.into(),
            secret_name: secret_name.into(),
        }
    }

    /// `https://{vault_name}.vault.azure.net/`
    pub fn vault_uri(&self) -> String {
        format!("https://{}.vault.azure.net/", self.vault_name)
    }

    /// Checks the fields needed to authenticate against a tenant.
    ///
    /// The vault fields are only checked when `requires_vault` is set; a
    /// locally supplied secret does not need them.
    pub fn validate(&self, requires_vault: bool) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(DirectoryError::config_error("client_id is required"));
        }
        if requires_vault {
            if self.vault_name.trim().is_empty() {
                return Err(DirectoryError::config_error("vault_name is required"));
            }
            if self.secret_name.trim().is_empty() {
                return Err(DirectoryError::config_error("secret_name is required"));
            }
        }
        Ok(())
    }
}
