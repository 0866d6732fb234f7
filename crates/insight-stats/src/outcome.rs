//! Test outcomes and the significance decision.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a test produced no result.
///
/// These are expected outcomes of running a test on real data, not failures;
/// callers display them and move on.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Insufficient {
    /// Fewer usable observations than the test needs.
    #[error("need at least {required} observations, found {found}")]
    TooFewObservations { required: usize, found: usize },

    /// One group of a grouped test is too small.
    #[error("group `{group}` needs at least {required} observations, found {found}")]
    GroupTooSmall {
        group: String,
        required: usize,
        found: usize,
    },

    /// A two-group test got a grouping column with another number of groups.
    #[error("expected exactly {expected} groups, found {found}")]
    WrongGroupCount { expected: usize, found: usize },

    /// Fewer usable groups than the test needs.
    #[error("need at least {required} groups with enough data, found {found}")]
    TooFewGroups { required: usize, found: usize },

    /// The statistic is undefined because the data has no spread.
    #[error("data has zero variance")]
    ZeroVariance,

    /// The crosstab of the two columns has no rows.
    #[error("contingency table is empty")]
    EmptyContingency,

    /// Value and grouping input are the same column.
    #[error("column `{column}` cannot be compared with itself")]
    SameColumn { column: String },

    /// A test parameter is outside its domain.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Result of a statistical test: a result record or the reason there is none.
pub type TestOutcome<T> = Result<T, Insufficient>;

/// Decision on the null hypothesis at a chosen alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Reject,
    FailToReject,
}

impl Significance {
    /// `Reject` when `p < alpha`.
    pub fn decide(p_value: f64, alpha: f64) -> Self {
        if p_value < alpha {
            Self::Reject
        } else {
            Self::FailToReject
        }
    }

    pub fn is_significant(self) -> bool {
        matches!(self, Self::Reject)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject H0",
            Self::FailToReject => "do not reject H0",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
