//! User handlers

use axum::{body::Bytes, extract::State};
use tracing::{info, instrument};

use graphgate_core::DirectoryUser;

use super::parse_body;
use crate::dto::{UserRequest, UsersRequest};
use crate::reply::{ListReply, LookupReply};
use crate::state::AppState;

/// `POST /api/users`
#[instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>, body: Bytes) -> ListReply<DirectoryUser> {
    info!("Processing list users request");

    let result = match parse_body::<UsersRequest>(&body) {
        Ok(request) => state.directory.list_users(&request).await,
        Err(e) => Err(e),
    };
    result.into()
}

/// `POST /api/user`
#[instrument(skip_all)]
pub async fn get_user(State(state): State<AppState>, body: Bytes) -> LookupReply<DirectoryUser> {
    info!("Processing get user request");

    let result = match parse_body::<UserRequest>(&body) {
        Ok(request) => state.directory.get_user(&request).await,
        Err(e) => Err(e),
    };
    result.into()
}
