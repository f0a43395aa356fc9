//! Server configuration
//!
//! Layered as: built-in defaults, `config/default`, `config/local`, then
//! `GRAPHGATE__`-prefixed environment variables (`__` separates sections,
//! e.g. `GRAPHGATE__DIRECTORY__CLIENT_ID`). Existing deployments configure
//! the proxy through the flat `ClientId`, `KeyVaultName`, `SecretName` and
//! `ClientSecret` variables; those fill any value still unset.

use anyhow::Result;
use secrecy::SecretString;
use serde::Deserialize;

use graphgate_core::DirectoryConfig;
use graphgate_graph::GraphEndpoints;

pub const ENV_PREFIX: &str = "GRAPHGATE";

#[derive(Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub directory: DirectoryConfig,
    pub graph: GraphEndpoints,
    pub identity: IdentitySettings,
    /// Use this secret instead of reading Key Vault (local development)
    pub local_client_secret: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Managed identity endpoint handed to the process by its host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentitySettings {
    pub endpoint: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    server: ServerSettings,
    #[serde(default)]
    directory: DirectoryConfig,
    #[serde(default)]
    graph: GraphEndpoints,
    #[serde(default)]
    identity: IdentitySettings,
    #[serde(default)]
    local_client_secret: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_sources(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
            |name| std::env::var(name).ok(),
        )
    }

    /// Build settings from `environment` plus the config files, consulting
    /// `flat_env` for the unprefixed variable names.
    pub fn from_sources(
        environment: config::Environment,
        flat_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config = config::Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?;

        let raw: RawSettings = config.try_deserialize()?;
        let flat = |name: &str| flat_env(name).filter(|v| !v.trim().is_empty());

        let mut directory = raw.directory;
        if directory.client_id.is_empty() {
            directory.client_id = flat("ClientId").unwrap_or_default();
        }
        if directory.vault_name.is_empty() {
            directory.vault_name = flat("KeyVaultName").unwrap_or_default();
        }
        if directory.secret_name.is_empty() {
            directory.secret_name = flat("SecretName").unwrap_or_default();
        }

        let identity = IdentitySettings {
            endpoint: raw.identity.endpoint.or_else(|| flat("IDENTITY_ENDPOINT")),
            header: raw.identity.header.or_else(|| flat("IDENTITY_HEADER")),
        };

        let local_client_secret = raw
            .local_client_secret
            .filter(|s| !s.is_empty())
            .or_else(|| flat("ClientSecret"))
            .map(SecretString::from);

        Ok(Self {
            server: raw.server,
            directory,
            graph: raw.graph,
            identity,
            local_client_secret,
        })
    }
}
