//! Client secret providers

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use graphgate_core::{DirectoryConfig, DirectoryError, Result, SecretProvider};

use crate::auth::ManagedIdentity;
use crate::endpoints::{KEY_VAULT_API_VERSION, KEY_VAULT_RESOURCE};
use crate::http::{check_status, read_json, HttpClient};

#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: String,
}

/// Reads the client secret from Azure Key Vault, authenticating with the
/// host's managed identity.
pub struct KeyVaultSecretProvider {
    http: HttpClient,
    identity: ManagedIdentity,
    vault_uri: String,
    secret_name: String,
}

impl KeyVaultSecretProvider {
    pub fn new(config: &DirectoryConfig, identity: ManagedIdentity) -> Result<Self> {
        Ok(Self::with_vault_uri(
            HttpClient::new()?,
            identity,
            config.vault_uri(),
            config.secret_name.clone(),
        ))
    }

    /// Point the provider at an explicit vault URI instead of `*.vault.azure.net`.
    pub fn with_vault_uri(
        http: HttpClient,
        identity: ManagedIdentity,
        vault_uri: impl Into<String>,
        secret_name: impl Into<String>,
    ) -> Self {
        Self {
            http,
            identity,
            vault_uri: vault_uri.into(),
            secret_name: secret_name.into(),
        }
    }

    fn secret_url(&self) -> String {
        format!(
            "{}/secrets/{}?api-version={}",
            self.vault_uri.trim_end_matches('/'),
            urlencoding::encode(&self.secret_name),
            KEY_VAULT_API_VERSION
        )
    }
}

#[async_trait]
impl SecretProvider for KeyVaultSecretProvider {
    #[instrument(skip(self), fields(secret_name = %self.secret_name))]
    async fn get_client_secret(&self) -> Result<SecretString> {
        let token = self
            .identity
            .request_token(&self.http, KEY_VAULT_RESOURCE)
            .await
            .map_err(|e| DirectoryError::secret_error(e.to_string()))?;

        let request = self
            .http
            .inner()
            .get(self.secret_url())
            .bearer_auth(token.expose_secret());

        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| DirectoryError::secret_error(e.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(|e| DirectoryError::secret_error(e.to_string()))?;
        let bundle: SecretBundle = read_json(response)
            .await
            .map_err(|e| DirectoryError::secret_error(e.to_string()))?;

        debug!("Resolved client secret from Key Vault");
        Ok(SecretString::from(bundle.value))
    }

    fn provider_type(&self) -> &'static str {
        "key_vault"
    }
}

/// Returns a secret supplied by local configuration.
pub struct StaticSecretProvider {
    secret: SecretString,
}

impl StaticSecretProvider {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn get_client_secret(&self) -> Result<SecretString> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(DirectoryError::secret_error("No local client secret configured"));
        }
        Ok(SecretString::from(secret.to_string()))
    }

    fn provider_type(&self) -> &'static str {
        "static"
    }
}
