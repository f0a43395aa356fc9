//! OData filter compilation
//!
//! Every filter sent to the directory is built here. Search strings are
//! trimmed, lowercased and emitted as escaped OData string literals, so a
//! quote in the input can never close the literal early.

use std::fmt;

use crate::models::GroupType;

/// Row cap applied to list queries when the request does not supply one
pub const DEFAULT_MAX_ROW_COUNT: u32 = 60;

/// Page size used when listing the members of a group
pub const MEMBER_PAGE_SIZE: u32 = 100;

/// Longest search string accepted by the exact-match lookups
pub const MAX_SEARCH_STRING_LENGTH: usize = 256;

const SECURITY_GROUP_CLAUSE: &str = "mailEnabled eq false and securityEnabled eq true";
const UNIFIED_GROUP_CLAUSE: &str = "groupTypes/any(c: c eq 'Unified')";

/// The query a filter is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Groups,
    Group,
    GroupMembers,
    Users,
    User,
}

impl QueryKind {
    /// Exact-match kinds compare `displayName` for equality and require a search string.
    pub fn is_exact_match(self) -> bool {
        matches!(self, Self::Group | Self::GroupMembers | Self::User)
    }
}

/// Compiled OData `$filter` expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression(String);

impl FilterExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clause-by-clause builder; clauses are joined with ` and `.
#[derive(Debug, Default)]
struct FilterBuilder {
    clauses: Vec<String>,
}

impl FilterBuilder {
    fn clause(&mut self, clause: &str) -> &mut Self {
        self.clauses.push(clause.to_string());
        self
    }

    fn starts_with(&mut self, property: &str, value: &str) -> &mut Self {
        self.clauses
            .push(format!("startsWith({}, {})", property, string_literal(value)));
        self
    }

    fn equals(&mut self, property: &str, value: &str) -> &mut Self {
        self.clauses
            .push(format!("{} eq {}", property, string_literal(value)));
        self
    }

    fn build(&self) -> FilterExpression {
        FilterExpression(self.clauses.join(" and "))
    }
}

/// Quote a value as an OData string literal, doubling embedded single quotes.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Trim and lowercase a search string; blank input counts as absent.
pub fn normalize_search(search_string: Option<&str>) -> Option<String> {
    search_string
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// A positive requested row count wins; anything else falls back to the default.
pub fn resolve_row_count(max_row_count: Option<i64>) -> u32 {
    max_row_count
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_ROW_COUNT)
}

/// Compile the filter for `kind`.
///
/// Exact-match kinds expect a validated, non-blank search string; given none
/// they compare against the empty literal.
pub fn compile(
    kind: QueryKind,
    group_type: Option<GroupType>,
    search_string: Option<&str>,
) -> FilterExpression {
    let search = normalize_search(search_string);
    let mut builder = FilterBuilder::default();

    match kind {
        QueryKind::Groups => {
            match group_type {
                Some(GroupType::SecurityGroup) => builder.clause(SECURITY_GROUP_CLAUSE),
                _ => builder.clause(UNIFIED_GROUP_CLAUSE),
            };
            if let Some(s) = &search {
                builder.starts_with("displayName", s);
            }
        }
        QueryKind::Users => {
            if let Some(s) = &search {
                builder.starts_with("displayName", s);
            }
        }
        QueryKind::Group | QueryKind::GroupMembers => {
            match group_type {
                Some(GroupType::SecurityGroup) => {
                    builder.clause(SECURITY_GROUP_CLAUSE);
                }
                Some(GroupType::O365Group) => {
                    builder.clause(UNIFIED_GROUP_CLAUSE);
                }
                Some(GroupType::Other) | None => {}
            }
            builder.equals("displayName", search.as_deref().unwrap_or_default());
        }
        QueryKind::User => {
            builder.equals("displayName", search.as_deref().unwrap_or_default());
        }
    }

    builder.build()
}
