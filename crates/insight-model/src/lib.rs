pub mod error;
pub mod options;
pub mod role;
pub mod table;

pub use error::{ModelError, Result};
pub use options::{ALPHA_RANGE, AnalysisOptions, CONFIDENCE_RANGE};
pub use role::{Role, RoleBinding, RoleMap, RoleOrigin};
pub use table::{Column, ColumnKind, ColumnValues, TRUTHY_TOKENS, Table, is_truthy_token};
