//! t-based tests, the mean confidence interval and one-way ANOVA.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::debug;

use insight_model::Column;

use crate::outcome::{Insufficient, TestOutcome};
use crate::sample::{
    GroupSummary, grouped_values, mean, numeric_values, require_len, std_dev, students_t,
    t_two_sided, two_groups, variance,
};

/// t-distribution confidence interval for a mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    pub confidence: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// `mean ± t(1 - (1 - c) / 2, n - 1) · s / √n` over the column's numbers.
pub fn confidence_interval_mean(
    column: &Column,
    confidence: f64,
) -> TestOutcome<ConfidenceInterval> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Insufficient::InvalidParameter {
            name: "confidence",
            value: confidence,
        });
    }
    let values = numeric_values(column);
    require_len(values.len(), 2)?;
    let n = values.len();
    let m = mean(&values);
    let s = std_dev(&values).unwrap_or(0.0);
    let t_crit = students_t((n - 1) as f64)?.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
    let half_width = t_crit * s / (n as f64).sqrt();
    Ok(ConfidenceInterval {
        n,
        mean: m,
        std: s,
        confidence,
        lower: m - half_width,
        upper: m + half_width,
    })
}

/// One-sample t-test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneSampleT {
    pub n: usize,
    pub mean: f64,
    pub mu: f64,
    pub t: f64,
    pub df: f64,
    pub p_value: f64,
}

/// Two-sided one-sample t-test of the column mean against `mu`.
pub fn one_sample_t(column: &Column, mu: f64) -> TestOutcome<OneSampleT> {
    if !mu.is_finite() {
        return Err(Insufficient::InvalidParameter {
            name: "mu",
            value: mu,
        });
    }
    let values = numeric_values(column);
    require_len(values.len(), 2)?;
    let n = values.len();
    let m = mean(&values);
    let s = std_dev(&values).unwrap_or(0.0);
    if s == 0.0 {
        return Err(Insufficient::ZeroVariance);
    }
    let t = (m - mu) / (s / (n as f64).sqrt());
    let df = (n - 1) as f64;
    Ok(OneSampleT {
        n,
        mean: m,
        mu,
        t,
        df,
        p_value: t_two_sided(t, df)?,
    })
}

/// Welch two-sample t-test result. `t` is positive when the first group's
/// mean is larger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelchT {
    pub t: f64,
    pub df: f64,
    pub p_value: f64,
    pub groups: [GroupSummary; 2],
}

/// Welch's t-test of `values` between the two groups of `groups`.
///
/// The grouping column must have exactly two distinct labels, each with at
/// least two numeric values.
pub fn two_sample_t(values: &Column, groups: &Column) -> TestOutcome<WelchT> {
    let [first, second] = two_groups(values, groups, 2)?;
    let (n1, n2) = (first.values.len() as f64, second.values.len() as f64);
    let a = variance(&first.values).unwrap_or(0.0) / n1;
    let b = variance(&second.values).unwrap_or(0.0) / n2;
    if a + b == 0.0 {
        return Err(Insufficient::ZeroVariance);
    }
    let t = (mean(&first.values) - mean(&second.values)) / (a + b).sqrt();
    let df = (a + b).powi(2) / (a.powi(2) / (n1 - 1.0) + b.powi(2) / (n2 - 1.0));
    Ok(WelchT {
        t,
        df,
        p_value: t_two_sided(t, df)?,
        groups: [GroupSummary::of(&first), GroupSummary::of(&second)],
    })
}

/// One-way ANOVA result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anova {
    pub f: f64,
    pub p_value: f64,
    pub df_between: usize,
    pub df_within: usize,
    /// Groups that entered the test, in first-seen order.
    pub groups: Vec<GroupSummary>,
    /// Labels of groups left out for having fewer than two values.
    pub dropped: Vec<String>,
}

/// One-way ANOVA of `values` across the labels of `groups`.
///
/// Groups with fewer than two numeric values are dropped; at least two groups
/// must remain.
pub fn one_way_anova(values: &Column, groups: &Column) -> TestOutcome<Anova> {
    if values.name() == groups.name() {
        return Err(Insufficient::SameColumn {
            column: values.name().to_string(),
        });
    }
    let (kept, dropped): (Vec<_>, Vec<_>) = grouped_values(values, groups)
        .into_iter()
        .partition(|g| g.values.len() >= 2);
    let dropped: Vec<String> = dropped.into_iter().map(|g| g.label).collect();
    if !dropped.is_empty() {
        debug!(dropped = ?dropped, "anova groups with fewer than two values dropped");
    }
    if kept.len() < 2 {
        return Err(Insufficient::TooFewGroups {
            required: 2,
            found: kept.len(),
        });
    }

    let k = kept.len();
    let total: usize = kept.iter().map(|g| g.values.len()).sum();
    let grand_mean = kept.iter().flat_map(|g| g.values.iter()).sum::<f64>() / total as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &kept {
        let m = mean(&group.values);
        ss_between += group.values.len() as f64 * (m - grand_mean).powi(2);
        ss_within += group.values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    }
    if ss_within == 0.0 {
        return Err(Insufficient::ZeroVariance);
    }

    let df_between = k - 1;
    let df_within = total - k;
    let f = (ss_between / df_between as f64) / (ss_within / df_within as f64);
    let dist = FisherSnedecor::new(df_between as f64, df_within as f64).map_err(|_| {
        Insufficient::InvalidParameter {
            name: "df",
            value: df_within as f64,
        }
    })?;
    Ok(Anova {
        f,
        p_value: dist.sf(f).min(1.0),
        df_between,
        df_within,
        groups: kept.iter().map(GroupSummary::of).collect(),
        dropped,
    })
}
