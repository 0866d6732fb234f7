//! Statistical tests over table columns.
//!
//! Every test takes [`Column`](insight_model::Column)s, coerces them to
//! numbers or labels, and returns a [`TestOutcome`]: a result record or an
//! [`Insufficient`] reason. Nothing here panics on bad data or decides
//! significance; callers apply [`Significance::decide`] with their own alpha.
//!
//! | Test | Function |
//! |---|---|
//! | CI for a mean | [`confidence_interval_mean`] |
//! | Pearson correlation | [`pearson`] |
//! | One-sample t | [`one_sample_t`] |
//! | Welch two-sample t | [`two_sample_t`] |
//! | Mann-Whitney U | [`mann_whitney_u`] |
//! | One-way ANOVA | [`one_way_anova`] |
//! | Chi-square independence | [`chi_square_independence`] |

pub mod contingency;
pub mod correlation;
pub mod describe;
pub mod nonparametric;
pub mod outcome;
pub mod parametric;
pub mod sample;

pub use contingency::{ChiSquare, ContingencyTable, chi_square_independence};
pub use correlation::{
    CorrelationMatrix, LinearTrend, Pearson, correlation_matrix, linear_trend, pearson,
};
pub use describe::{ColumnProfile, NumericSummary, describe, describe_table, profile};
pub use nonparametric::{EXACT_CUTOFF, MannWhitney, UMethod, mann_whitney_u};
pub use outcome::{Insufficient, Significance, TestOutcome};
pub use parametric::{
    Anova, ConfidenceInterval, OneSampleT, WelchT, confidence_interval_mean, one_sample_t,
    one_way_anova, two_sample_t,
};
pub use sample::{Group, GroupSummary, grouped_values, numeric_values, paired_values};
