//! Group handlers

use axum::{body::Bytes, extract::State};
use tracing::{info, instrument};

use graphgate_core::{Collection, DirectoryGroup, DirectoryUser};

use super::parse_body;
use crate::dto::{GroupRequest, GroupsRequest};
use crate::reply::{ListReply, LookupReply};
use crate::state::AppState;

/// `POST /api/groups`
#[instrument(skip_all)]
pub async fn list_groups(State(state): State<AppState>, body: Bytes) -> ListReply<DirectoryGroup> {
    info!("Processing list groups request");

    let result = match parse_body::<GroupsRequest>(&body) {
        Ok(request) => state.directory.list_groups(&request).await,
        Err(e) => Err(e),
    };
    result.into()
}

/// `POST /api/group`
#[instrument(skip_all)]
pub async fn get_group(State(state): State<AppState>, body: Bytes) -> LookupReply<DirectoryGroup> {
    info!("Processing get group request");

    let result = match parse_body::<GroupRequest>(&body) {
        Ok(request) => state.directory.get_group(&request).await,
        Err(e) => Err(e),
    };
    result.into()
}

/// `POST /api/groupmembers`
#[instrument(skip_all)]
pub async fn list_group_members(
    State(state): State<AppState>,
    body: Bytes,
) -> LookupReply<Collection<DirectoryUser>> {
    info!("Processing list group members request");

    let result = match parse_body::<GroupRequest>(&body) {
        Ok(request) => state.directory.list_group_members(&request).await,
        Err(e) => Err(e),
    };
    result.map(Collection::new).into()
}
