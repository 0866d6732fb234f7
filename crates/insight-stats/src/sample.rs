//! Numeric coercion and sample moments.
//!
//! Every test reads its inputs through these helpers, so coercion is uniform:
//! values that do not coerce to a finite number are dropped (pairwise for
//! bivariate inputs) instead of raising errors.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use insight_model::Column;

use crate::outcome::{Insufficient, TestOutcome};

/// Present numeric values of a column.
pub fn numeric_values(column: &Column) -> Vec<f64> {
    column.coerce_numeric().into_iter().flatten().collect()
}

/// Rows where both columns coerce to numbers.
pub fn paired_values(x: &Column, y: &Column) -> Vec<(f64, f64)> {
    x.coerce_numeric()
        .into_iter()
        .zip(y.coerce_numeric())
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect()
}

/// Numeric values of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub label: String,
    pub values: Vec<f64>,
}

/// Splits `values` by the labels of `groups`.
///
/// Groups are the distinct non-missing labels in first-seen order, whether or
/// not their rows hold a usable number, so a group may come back empty.
pub fn grouped_values(values: &Column, groups: &Column) -> Vec<Group> {
    let mut out: Vec<Group> = groups
        .distinct_labels()
        .into_iter()
        .map(|label| Group {
            label,
            values: Vec::new(),
        })
        .collect();
    for row in 0..groups.len().min(values.len()) {
        let (Some(label), Some(value)) = (groups.label_at(row), values.numeric_at(row)) else {
            continue;
        };
        if let Some(group) = out.iter_mut().find(|g| g.label == label) {
            group.values.push(value);
        }
    }
    out
}

/// The two groups of a two-group test, each with at least `min_n` values.
pub(crate) fn two_groups(
    values: &Column,
    groups: &Column,
    min_n: usize,
) -> TestOutcome<[Group; 2]> {
    if values.name() == groups.name() {
        return Err(Insufficient::SameColumn {
            column: values.name().to_string(),
        });
    }
    let grouped = grouped_values(values, groups);
    let found = grouped.len();
    let [first, second]: [Group; 2] = grouped
        .try_into()
        .map_err(|_| Insufficient::WrongGroupCount { expected: 2, found })?;
    for group in [&first, &second] {
        if group.values.len() < min_n {
            return Err(Insufficient::GroupTooSmall {
                group: group.label.clone(),
                required: min_n,
                found: group.values.len(),
            });
        }
    }
    Ok([first, second])
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator). `None` below two values.
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Quantile with linear interpolation between closest ranks. `sorted` must be
/// ascending and non-empty.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

/// Count, mean, spread and median of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single value.
    pub std: Option<f64>,
    pub median: f64,
}

impl GroupSummary {
    /// Summary of a non-empty group.
    pub fn of(group: &Group) -> Self {
        Self {
            label: group.label.clone(),
            n: group.values.len(),
            mean: mean(&group.values),
            std: std_dev(&group.values),
            median: median(&group.values),
        }
    }
}

pub(crate) fn require_len(found: usize, required: usize) -> TestOutcome<()> {
    if found < required {
        Err(Insufficient::TooFewObservations { required, found })
    } else {
        Ok(())
    }
}

pub(crate) fn students_t(df: f64) -> TestOutcome<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|_| Insufficient::InvalidParameter {
        name: "df",
        value: df,
    })
}

/// Two-sided p-value of a t statistic.
pub(crate) fn t_two_sided(t: f64, df: f64) -> TestOutcome<f64> {
    let dist = students_t(df)?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_model::ColumnValues;

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
    }

    #[test]
    fn pairs_drop_rows_missing_on_either_side() {
        let x = Column::new(
            "x",
            ColumnValues::Numeric(vec![Some(1.0), None, Some(3.0), Some(4.0)]),
        );
        let y = Column::from_labels("y", ["10", "20", "n/a", "40"]);
        assert_eq!(paired_values(&x, &y), vec![(1.0, 10.0), (4.0, 40.0)]);
    }

    #[test]
    fn groups_follow_first_seen_label_order() {
        let values = Column::new(
            "v",
            ColumnValues::Numeric(vec![Some(1.0), Some(2.0), None, Some(4.0)]),
        );
        let groups = Column::from_labels("g", ["B", "A", "C", "B"]);
        let grouped = grouped_values(&values, &groups);
        let labels: Vec<&str> = grouped.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
        assert_eq!(grouped[0].values, vec![1.0, 4.0]);
        assert!(grouped[2].values.is_empty());
    }

    #[test]
    fn variance_needs_two_values() {
        assert_eq!(variance(&[3.0]), None);
        assert_eq!(variance(&[1.0, 3.0]), Some(2.0));
    }
}
