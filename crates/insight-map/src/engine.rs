//! Column role resolution.

use tracing::{debug, warn};

use insight_model::{Role, RoleMap};

use crate::error::MappingError;
use crate::patterns::{RolePatterns, default_patterns};
use crate::utils::normalize_column_name;

/// How a column was matched to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The normalized name fully matches a role pattern.
    Exact,
    /// The normalized name contains a match for a role pattern.
    Substring,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
        }
    }
}

/// One automatic role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMatch {
    pub role: Role,
    pub column: String,
    pub kind: MatchKind,
}

/// Assigns dataset columns to [`Role`]s by regex matching on normalized names.
///
/// Resolution runs in two passes. The exact pass gives every role the first
/// column (in table order) whose normalized name fully matches one of its
/// patterns. The substring pass then gives each still unresolved role the
/// first column containing a match. An exact hit therefore always beats a
/// substring hit for the same role, whatever the column or pattern order.
///
/// Roles are independent: one column may serve several roles.
///
/// # Example
///
/// ```
/// use insight_map::ColumnRoleMapper;
/// use insight_model::Role;
///
/// let mapper = ColumnRoleMapper::new();
/// let map = mapper.resolve(&["Order Date Extra".to_string(), "Date".to_string()]);
/// assert_eq!(map.get(Role::DataPedido), Some("Date"));
/// ```
#[derive(Debug, Clone)]
pub struct ColumnRoleMapper {
    patterns: Vec<RolePatterns>,
}

impl Default for ColumnRoleMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnRoleMapper {
    /// Creates a mapper with the built-in pattern table.
    pub fn new() -> Self {
        let patterns = default_patterns()
            .into_iter()
            .map(|(role, sources)| RolePatterns::compile(role, &sources))
            .collect::<Result<Vec<_>, _>>()
            .expect("Invalid built-in role pattern");
        Self { patterns }
    }

    /// Creates a mapper from a custom pattern table.
    ///
    /// Roles are resolved in the order given. Roles missing from the table
    /// are never resolved automatically.
    pub fn with_patterns<I, S>(table: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (Role, Vec<S>)>,
        S: AsRef<str>,
    {
        let patterns = table
            .into_iter()
            .map(|(role, sources)| RolePatterns::compile(role, &sources))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Pattern sources for a role, if the table has any.
    pub fn patterns_for(&self, role: Role) -> Option<&[String]> {
        self.patterns
            .iter()
            .find(|p| p.role == role)
            .map(|p| p.sources.as_slice())
    }

    /// Resolves roles for `columns` and reports how each was matched.
    pub fn resolve_detailed(&self, columns: &[String]) -> Vec<RoleMatch> {
        let normalized: Vec<String> = columns
            .iter()
            .map(|c| normalize_column_name(c))
            .collect();
        let mut matches: Vec<RoleMatch> = Vec::new();

        for entry in &self.patterns {
            if let Some(idx) = first_match(&normalized, &entry.exact) {
                matches.push(RoleMatch {
                    role: entry.role,
                    column: columns[idx].clone(),
                    kind: MatchKind::Exact,
                });
            }
        }

        for entry in &self.patterns {
            if matches.iter().any(|m| m.role == entry.role) {
                continue;
            }
            if let Some(idx) = first_match(&normalized, &entry.search) {
                matches.push(RoleMatch {
                    role: entry.role,
                    column: columns[idx].clone(),
                    kind: MatchKind::Substring,
                });
            }
        }

        matches.sort_by_key(|m| m.role);
        for m in &matches {
            debug!(role = %m.role, column = %m.column, kind = m.kind.as_str(), "role resolved");
        }
        matches
    }

    /// Resolves roles for `columns`. Every entry of the result is automatic.
    pub fn resolve(&self, columns: &[String]) -> RoleMap {
        let mut map = RoleMap::new();
        for m in self.resolve_detailed(columns) {
            map.set_auto(m.role, m.column);
        }
        map
    }

    /// Fills roles absent from `existing` with entries from `fresh`.
    ///
    /// Present entries of `existing`, pinned or automatic, are kept as is.
    pub fn merge(existing: &RoleMap, fresh: &RoleMap) -> RoleMap {
        let mut merged = existing.clone();
        merged.fill_absent(fresh);
        merged
    }

    /// Re-validates `existing` against a new column set and fills the gaps.
    ///
    /// Entries naming columns that no longer exist are dropped (pinned ones
    /// included), then automatic results fill every absent role.
    pub fn refresh(&self, existing: &RoleMap, columns: &[String]) -> RoleMap {
        let mut current = existing.clone();
        for role in current.retain_existing(columns) {
            warn!(role = %role, "mapped column no longer present; role cleared");
        }
        Self::merge(&current, &self.resolve(columns))
    }
}

fn first_match(normalized: &[String], patterns: &[regex::Regex]) -> Option<usize> {
    normalized
        .iter()
        .position(|name| patterns.iter().any(|p| p.is_match(name)))
}
