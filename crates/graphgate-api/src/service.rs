//! Directory operations behind the HTTP handlers
//!
//! Each operation validates its request, compiles the filter, resolves the
//! client secret, builds a tenant-bound client and runs its query. Steps run
//! strictly in that order, so a rejected request never touches the secret
//! store or the directory.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use graphgate_core::{
    compile, fetch_all, parse_object_id, project_all, resolve_row_count, ClientCredentials,
    DirectoryClient, DirectoryClientFactory, DirectoryCollection, DirectoryConfig,
    DirectoryError, DirectoryGroup, DirectoryObject, DirectoryQuery, DirectoryUser, QueryKind,
    Result, SecretProvider, TenantId, GROUP_FIELDS, GROUP_ID_FIELDS,
};

use crate::dto::{GroupRequest, GroupsRequest, UserRequest, UsersRequest};
use crate::validation::{validate_lookup_search, validate_tenant};

pub struct DirectoryService {
    config: DirectoryConfig,
    secrets: Arc<dyn SecretProvider>,
    clients: Arc<dyn DirectoryClientFactory>,
}

impl DirectoryService {
    pub fn new(
        config: DirectoryConfig,
        secrets: Arc<dyn SecretProvider>,
        clients: Arc<dyn DirectoryClientFactory>,
    ) -> Self {
        Self {
            config,
            secrets,
            clients,
        }
    }

    /// Resolve the client secret and build a client bound to `tenant_id`.
    async fn connect(&self, tenant_id: TenantId) -> Result<Box<dyn DirectoryClient>> {
        let client_secret = self.secrets.get_client_secret().await?;
        debug!(
            "Resolved client secret via {} provider",
            self.secrets.provider_type()
        );

        self.clients.create(ClientCredentials {
            tenant_id,
            client_id: self.config.client_id.clone(),
            client_secret,
        })
    }

    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
    pub async fn list_groups(&self, request: &GroupsRequest) -> Result<Vec<DirectoryGroup>> {
        validate_tenant(&request.tenant_id)?;

        let filter = compile(
            QueryKind::Groups,
            request.group_type,
            request.search_string.as_deref(),
        );
        let query = DirectoryQuery::new(filter)
            .with_select(GROUP_FIELDS)
            .with_top(resolve_row_count(request.max_row_count));

        let client = self.connect(request.tenant_id).await?;
        let records = fetch_all(client.as_ref(), &DirectoryCollection::Groups, &query).await?;

        info!("Found {} groups", records.len());
        project_all(&records)
    }

    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
    pub async fn get_group(&self, request: &GroupRequest) -> Result<DirectoryGroup> {
        validate_tenant(&request.tenant_id)?;
        let search = validate_lookup_search(request.search_string.as_deref())?;

        let filter = compile(QueryKind::Group, request.group_type, Some(search));
        let query = DirectoryQuery::new(filter).with_select(GROUP_FIELDS);

        let client = self.connect(request.tenant_id).await?;
        let page = client.query(&DirectoryCollection::Groups, &query).await?;

        let record = single_match(page.value, "group")?;
        DirectoryGroup::try_from(&record)
    }

    /// Resolve exactly one group by name, then list its user members.
    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
    pub async fn list_group_members(&self, request: &GroupRequest) -> Result<Vec<DirectoryUser>> {
        validate_tenant(&request.tenant_id)?;
        let search = validate_lookup_search(request.search_string.as_deref())?;

        let filter = compile(QueryKind::GroupMembers, request.group_type, Some(search));
        let query = DirectoryQuery::new(filter).with_select(GROUP_ID_FIELDS);

        let client = self.connect(request.tenant_id).await?;
        let page = client.query(&DirectoryCollection::Groups, &query).await?;

        let group = single_match(page.value, "group")?;
        let group_id = parse_object_id(&group.id)?;

        let members = fetch_all(
            client.as_ref(),
            &DirectoryCollection::GroupMembers {
                group_id: group_id.to_string(),
            },
            &DirectoryQuery::members(),
        )
        .await?;

        let total = members.len();
        let users: Vec<DirectoryObject> = members
            .into_iter()
            .filter(|member| {
                let keep = member.is_user();
                if !keep {
                    debug!(
                        "Skipping member {} of type {}",
                        member.id,
                        member.odata_type.as_deref().unwrap_or("unknown")
                    );
                }
                keep
            })
            .collect();

        info!(
            "Group {} has {} members, {} users",
            group_id,
            total,
            users.len()
        );
        project_all(&users)
    }

    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
    pub async fn list_users(&self, request: &UsersRequest) -> Result<Vec<DirectoryUser>> {
        validate_tenant(&request.tenant_id)?;

        let filter = compile(QueryKind::Users, None, request.search_string.as_deref());
        let query = DirectoryQuery::new(filter).with_top(resolve_row_count(request.max_row_count));

        let client = self.connect(request.tenant_id).await?;
        let records = fetch_all(client.as_ref(), &DirectoryCollection::Users, &query).await?;

        info!("Found {} users", records.len());
        project_all(&records)
    }

    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
    pub async fn get_user(&self, request: &UserRequest) -> Result<DirectoryUser> {
        validate_tenant(&request.tenant_id)?;
        let search = validate_lookup_search(request.search_string.as_deref())?;

        let query = DirectoryQuery::new(compile(QueryKind::User, None, Some(search)));

        let client = self.connect(request.tenant_id).await?;
        let page = client.query(&DirectoryCollection::Users, &query).await?;

        let record = single_match(page.value, "user")?;
        DirectoryUser::try_from(&record)
    }
}

/// A lookup succeeds only when exactly one record matched.
fn single_match(mut records: Vec<DirectoryObject>, entity_type: &str) -> Result<DirectoryObject> {
    match records.len() {
        1 => records
            .pop()
            .ok_or_else(|| DirectoryError::not_found(entity_type)),
        n => {
            debug!("Lookup matched {} {} records", n, entity_type);
            Err(DirectoryError::not_found(entity_type))
        }
    }
}
