//! Request validation
//!
//! Runs before any secret or network access. Failures carry the exact text
//! returned to the caller.

use graphgate_core::{DirectoryError, Result, TenantId, MAX_SEARCH_STRING_LENGTH};

pub const INVALID_TENANT_ID: &str = "Invalid Tenant Id";
pub const EMPTY_SEARCH_STRING: &str =
    "Invalid SearchString Parameter: The SearchString parameter cannot be empty.";
pub const SEARCH_STRING_TOO_LONG: &str =
    "Invalid SearchString Parameter: The SearchString parameter must be 256 Characters or less.";

pub fn validate_tenant(tenant_id: &TenantId) -> Result<()> {
    if tenant_id.is_nil() {
        return Err(DirectoryError::invalid_input(INVALID_TENANT_ID));
    }
    Ok(())
}

/// Lookups need a non-blank search string of at most 256 characters.
pub fn validate_lookup_search(search_string: Option<&str>) -> Result<&str> {
    match search_string {
        Some(s) if !s.trim().is_empty() => {
            if s.chars().count() > MAX_SEARCH_STRING_LENGTH {
                Err(DirectoryError::invalid_input(SEARCH_STRING_TOO_LONG))
            } else {
                Ok(s)
            }
        }
        _ => Err(DirectoryError::invalid_input(EMPTY_SEARCH_STRING)),
    }
}
