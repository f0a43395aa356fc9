//! Directory records and the reduced projections returned to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DirectoryError, Result};

/// `@odata.type` annotation carried by user objects in member listings.
pub const ODATA_USER_TYPE: &str = "#microsoft.graph.user";

/// Kind of group a lookup is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupType {
    /// Security-enabled, non-mail-enabled groups
    SecurityGroup,
    /// Microsoft 365 ("Unified") groups
    O365Group,
    /// Any value the proxy has no filter clause for
    #[serde(other)]
    Other,
}

// =============================================================================
// Raw directory records
// =============================================================================

/// A directory object as returned by the Graph API.
///
/// Superset of the group and user fields the proxy reads; every field other
/// than `id` is optional because `$select` trims the payload per query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryObject {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "@odata.type")]
    pub odata_type: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub mail: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub user_principal_name: Option<String>,
    pub preferred_name: Option<String>,
    pub preferred_language: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub job_title: Option<String>,
    pub account_enabled: Option<bool>,
}

impl DirectoryObject {
    /// Whether this object is a user. Objects without a type annotation are
    /// assumed to be users, which is what `/users` queries return.
    pub fn is_user(&self) -> bool {
        self.odata_type
            .as_deref()
            .map_or(true, |t| t == ODATA_USER_TYPE)
    }
}

// =============================================================================
// Projections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    #[serde(rename = "upn")]
    pub user_principal_name: Option<String>,
    pub preferred_name: Option<String>,
    pub preferred_language: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "createdDateTime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<&DirectoryObject> for DirectoryGroup {
    type Error = DirectoryError;

    fn try_from(raw: &DirectoryObject) -> Result<Self> {
        Ok(Self {
            id: parse_object_id(&raw.id)?,
            display_name: raw.display_name.clone(),
            email: raw.mail.clone(),
            description: raw.description.clone(),
        })
    }
}

impl TryFrom<&DirectoryObject> for DirectoryUser {
    type Error = DirectoryError;

    fn try_from(raw: &DirectoryObject) -> Result<Self> {
        Ok(Self {
            id: parse_object_id(&raw.id)?,
            display_name: raw.display_name.clone(),
            given_name: raw.given_name.clone(),
            surname: raw.surname.clone(),
            user_principal_name: raw.user_principal_name.clone(),
            preferred_name: raw.preferred_name.clone(),
            preferred_language: raw.preferred_language.clone(),
            email: raw.mail.clone(),
            created_at: raw.created_date_time,
        })
    }
}

/// Parse a directory object id, surfacing a malformed id as a processing failure.
pub fn parse_object_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|e| DirectoryError::MalformedRecord {
        id: id.to_string(),
        message: e.to_string(),
    })
}

/// Project every raw record, failing on the first malformed one.
pub fn project_all<T>(records: &[DirectoryObject]) -> Result<Vec<T>>
where
    T: for<'a> TryFrom<&'a DirectoryObject, Error = DirectoryError>,
{
    records.iter().map(T::try_from).collect()
}

/// Ordered result set returned by the list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}
