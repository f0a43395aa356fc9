//! Request and response bodies

use serde::{Deserialize, Serialize};

use graphgate_core::{GroupType, TenantId};

// ============================================================================
// Request DTOs
// ============================================================================
//
// Field names are camelCase; the PascalCase names used by existing callers
// and snake_case are accepted as aliases. A missing tenant id is the nil
// UUID and fails validation.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsRequest {
    #[serde(
        default,
        alias = "TenantUId",
        alias = "tenantUId",
        alias = "TenantId",
        alias = "tenant_id"
    )]
    pub tenant_id: TenantId,
    #[serde(default, alias = "GroupType", alias = "group_type")]
    pub group_type: Option<GroupType>,
    #[serde(default, alias = "MaxRowCount", alias = "max_row_count")]
    pub max_row_count: Option<i64>,
    #[serde(default, alias = "SearchString", alias = "search_string")]
    pub search_string: Option<String>,
}

/// Single group lookup; also names the group whose members are listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    #[serde(
        default,
        alias = "TenantUId",
        alias = "tenantUId",
        alias = "TenantId",
        alias = "tenant_id"
    )]
    pub tenant_id: TenantId,
    #[serde(default, alias = "GroupType", alias = "group_type")]
    pub group_type: Option<GroupType>,
    #[serde(default, alias = "SearchString", alias = "search_string")]
    pub search_string: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersRequest {
    #[serde(
        default,
        alias = "TenantUId",
        alias = "tenantUId",
        alias = "TenantId",
        alias = "tenant_id"
    )]
    pub tenant_id: TenantId,
    #[serde(default, alias = "MaxRowCount", alias = "max_row_count")]
    pub max_row_count: Option<i64>,
    #[serde(default, alias = "SearchString", alias = "search_string")]
    pub search_string: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(
        default,
        alias = "TenantUId",
        alias = "tenantUId",
        alias = "TenantId",
        alias = "tenant_id"
    )]
    pub tenant_id: TenantId,
    #[serde(default, alias = "SearchString", alias = "search_string")]
    pub search_string: Option<String>,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Body of a lookup's `500` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

/// Liveness probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
