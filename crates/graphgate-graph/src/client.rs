//! Microsoft Graph directory client

use async_trait::async_trait;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use graphgate_core::{
    ClientCredentials, DirectoryClient, DirectoryClientFactory, DirectoryCollection,
    DirectoryObject, DirectoryQuery, Page, Result,
};

use crate::auth::request_client_token;
use crate::endpoints::GraphEndpoints;
use crate::http::{check_status, read_json, HttpClient};

/// Graph client bound to one tenant's credentials.
///
/// The access token is requested on first use and reused for the lifetime of
/// the client, which is a single proxied request.
pub struct GraphClient {
    http: HttpClient,
    endpoints: GraphEndpoints,
    credentials: ClientCredentials,
    token: OnceCell<SecretString>,
}

impl GraphClient {
    pub fn new(http: HttpClient, endpoints: GraphEndpoints, credentials: ClientCredentials) -> Self {
        Self {
            http,
            endpoints,
            credentials,
            token: OnceCell::new(),
        }
    }

    async fn access_token(&self) -> Result<&SecretString> {
        self.token
            .get_or_try_init(|| request_client_token(&self.http, &self.endpoints, &self.credentials))
            .await
    }

    /// Absolute URL for `query` against `collection`.
    pub fn query_url(&self, collection: &DirectoryCollection, query: &DirectoryQuery) -> String {
        let path = match collection {
            DirectoryCollection::Groups => "/groups".to_string(),
            DirectoryCollection::Users => "/users".to_string(),
            DirectoryCollection::GroupMembers { group_id } => {
                format!("/groups/{}/members", urlencoding::encode(group_id))
            }
        };

        let mut params = Vec::new();
        if !query.filter.is_empty() {
            params.push(format!(
                "$filter={}",
                urlencoding::encode(query.filter.as_str())
            ));
        }
        if !query.select.is_empty() {
            params.push(format!(
                "$select={}",
                urlencoding::encode(&query.select.join(","))
            ));
        }
        if query.count {
            params.push("$count=true".to_string());
        }
        if let Some(top) = query.top {
            params.push(format!("$top={}", top));
        }

        let url = self.endpoints.graph_url(&path);
        if params.is_empty() {
            url
        } else {
            format!("{}?{}", url, params.join("&"))
        }
    }

    async fn get_page(&self, url: &str, query: &DirectoryQuery) -> Result<Page<DirectoryObject>> {
        let token = self.access_token().await?;

        let mut request: RequestBuilder = self
            .http
            .inner()
            .get(url)
            .bearer_auth(token.expose_secret());
        if query.eventual_consistency {
            request = request.header("ConsistencyLevel", "eventual");
        }

        let response = check_status(self.http.send(request).await?).await?;
        let page: Page<DirectoryObject> = read_json(response).await?;

        debug!(
            "Fetched {} records (more: {})",
            page.len(),
            page.next_link.is_some()
        );
        Ok(page)
    }
}

#[async_trait]
impl DirectoryClient for GraphClient {
    #[instrument(skip(self, query), fields(tenant_id = %self.credentials.tenant_id, filter = %query.filter))]
    async fn query(
        &self,
        collection: &DirectoryCollection,
        query: &DirectoryQuery,
    ) -> Result<Page<DirectoryObject>> {
        let url = self.query_url(collection, query);
        self.get_page(&url, query).await
    }

    #[instrument(skip(self, next_link, query), fields(tenant_id = %self.credentials.tenant_id))]
    async fn next_page(
        &self,
        next_link: &str,
        query: &DirectoryQuery,
    ) -> Result<Page<DirectoryObject>> {
        self.get_page(next_link, query).await
    }
}

/// Builds a [`GraphClient`] per set of credentials, sharing one HTTP client.
#[derive(Clone)]
pub struct GraphClientFactory {
    http: HttpClient,
    endpoints: GraphEndpoints,
}

impl GraphClientFactory {
    pub fn new(endpoints: GraphEndpoints) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            endpoints,
        })
    }

    pub fn with_http_client(http: HttpClient, endpoints: GraphEndpoints) -> Self {
        Self { http, endpoints }
    }
}

impl DirectoryClientFactory for GraphClientFactory {
    fn create(&self, credentials: ClientCredentials) -> Result<Box<dyn DirectoryClient>> {
        Ok(Box::new(GraphClient::new(
            self.http.clone(),
            self.endpoints.clone(),
            credentials,
        )))
    }
}
