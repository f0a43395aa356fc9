//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(handlers::liveness))
        .nest("/api", api_routes(state))
}

/// Directory query routes
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/groups", post(handlers::groups::list_groups))
        .route("/group", post(handlers::groups::get_group))
        .route("/groupmembers", post(handlers::groups::list_group_members))
        .route("/users", post(handlers::users::list_users))
        .route("/user", post(handlers::users::get_user))
        .with_state(state)
}
