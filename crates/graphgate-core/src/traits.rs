//! Collaborator traits the request handlers depend on

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{
    error::Result,
    ids::TenantId,
    models::DirectoryObject,
    paging::Page,
    query::{DirectoryCollection, DirectoryQuery},
};

/// Resolves the application's client secret
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_client_secret(&self) -> Result<SecretString>;

    fn provider_type(&self) -> &'static str;
}

/// An authenticated handle on one tenant's directory
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Run `query` and return its first page.
    async fn query(
        &self,
        collection: &DirectoryCollection,
        query: &DirectoryQuery,
    ) -> Result<Page<DirectoryObject>>;

    /// Follow a next link returned by a previous page of `query`.
    async fn next_page(&self, next_link: &str, query: &DirectoryQuery)
        -> Result<Page<DirectoryObject>>;
}

/// Credentials for the client-credentials flow against one tenant
#[derive(Debug)]
pub struct ClientCredentials {
    pub tenant_id: TenantId,
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Builds authenticated directory clients
pub trait DirectoryClientFactory: Send + Sync {
    fn create(&self, credentials: ClientCredentials) -> Result<Box<dyn DirectoryClient>>;
}
