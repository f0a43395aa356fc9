//! Directory query descriptions handed to a `DirectoryClient`

use crate::filter::FilterExpression;

/// Fields requested for group listings and lookups
pub const GROUP_FIELDS: &[&str] = &[
    "id",
    "displayName",
    "description",
    "mail",
    "members",
    "createdDateTime",
];

/// Fields requested when resolving the group whose members are listed
pub const GROUP_ID_FIELDS: &[&str] = &["id"];

/// Fields requested for each member of a group
pub const MEMBER_FIELDS: &[&str] = &[
    "id",
    "displayName",
    "mail",
    "memberOf",
    "jobTitle",
    "accountEnabled",
    "userPrincipalName",
    "createdDateTime",
];

/// Directory collection a query runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCollection {
    Groups,
    Users,
    GroupMembers { group_id: String },
}

/// A single directory query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub filter: FilterExpression,
    /// Empty means the directory's default field set
    pub select: &'static [&'static str],
    pub top: Option<u32>,
    /// Request `$count=true`
    pub count: bool,
    /// Send `ConsistencyLevel: eventual`
    pub eventual_consistency: bool,
}

impl DirectoryQuery {
    /// Counted, eventually consistent query with the directory's default fields.
    pub fn new(filter: FilterExpression) -> Self {
        Self {
            filter,
            select: &[],
            top: None,
            count: true,
            eventual_consistency: true,
        }
    }

    pub fn with_select(mut self, select: &'static [&'static str]) -> Self {
        self.select = select;
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Member listings carry no filter or count, only the page size and field list.
    pub fn members() -> Self {
        Self {
            filter: FilterExpression::default(),
            select: MEMBER_FIELDS,
            top: Some(crate::filter::MEMBER_PAGE_SIZE),
            count: false,
            eventual_consistency: true,
        }
    }
}
