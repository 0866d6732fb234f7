//! Column role mapping.
//!
//! [`ColumnRoleMapper`] assigns dataset columns to the fixed [`Role`] set by
//! regex matching on normalized column names. The caller owns the resulting
//! [`RoleMap`]; [`ColumnRoleMapper::merge`] and [`ColumnRoleMapper::refresh`]
//! combine stored or pinned choices with fresh automatic results without
//! overwriting anything already present.
//!
//! [`Role`]: insight_model::Role
//! [`RoleMap`]: insight_model::RoleMap

#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod patterns;
pub mod repository;
pub mod utils;

pub use engine::{ColumnRoleMapper, MatchKind, RoleMatch};
pub use error::MappingError;
pub use patterns::{RolePatterns, default_patterns};
pub use repository::{RoleMapMetadata, RoleMapRepository, StoredRoleMap, dataset_id};
pub use utils::normalize_column_name;
