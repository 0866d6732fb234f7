//! Chi-square test of independence over a crosstab of two categorical columns.

use std::cmp::Ordering;

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use insight_model::Column;

use crate::outcome::{Insufficient, TestOutcome};

/// Observed and expected counts of two categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub observed: Vec<Vec<u64>>,
    pub expected: Vec<Vec<f64>>,
}

impl ContingencyTable {
    /// Crosstab of rows where both columns have a label. Labels are sorted,
    /// numerically when both parse as numbers.
    pub fn from_columns(rows: &Column, columns: &Column) -> Self {
        let pairs: Vec<(String, String)> = (0..rows.len().min(columns.len()))
            .filter_map(|i| Some((rows.label_at(i)?, columns.label_at(i)?)))
            .collect();
        let row_labels = sorted_labels(pairs.iter().map(|(r, _)| r));
        let column_labels = sorted_labels(pairs.iter().map(|(_, c)| c));

        let mut observed = vec![vec![0u64; column_labels.len()]; row_labels.len()];
        for (r, c) in &pairs {
            if let (Some(i), Some(j)) = (
                row_labels.iter().position(|l| l == r),
                column_labels.iter().position(|l| l == c),
            ) {
                observed[i][j] += 1;
            }
        }

        let total: u64 = observed.iter().flatten().sum();
        let row_sums: Vec<u64> = observed.iter().map(|row| row.iter().sum()).collect();
        let col_sums: Vec<u64> = (0..column_labels.len())
            .map(|j| observed.iter().map(|row| row[j]).sum())
            .collect();
        let expected = row_sums
            .iter()
            .map(|&r| {
                col_sums
                    .iter()
                    .map(|&c| (r * c) as f64 / total as f64)
                    .collect()
            })
            .collect();

        Self {
            row_labels,
            column_labels,
            observed,
            expected,
        }
    }

    pub fn total(&self) -> u64 {
        self.observed.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }

    /// Degrees of freedom `(r - 1)(c - 1)`.
    pub fn dof(&self) -> usize {
        self.row_labels.len().saturating_sub(1) * self.column_labels.len().saturating_sub(1)
    }
}

/// Chi-square test of independence result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquare {
    pub chi2: f64,
    pub dof: usize,
    pub p_value: f64,
    /// Whether the Yates continuity correction was applied (only when dof = 1).
    pub yates: bool,
    pub table: ContingencyTable,
}

/// Pearson chi-square test of independence between two categorical columns.
pub fn chi_square_independence(a: &Column, b: &Column) -> TestOutcome<ChiSquare> {
    if a.name() == b.name() {
        return Err(Insufficient::SameColumn {
            column: a.name().to_string(),
        });
    }
    let table = ContingencyTable::from_columns(a, b);
    if table.is_empty() {
        return Err(Insufficient::EmptyContingency);
    }
    let dof = table.dof();
    if dof == 0 {
        return Ok(ChiSquare {
            chi2: 0.0,
            dof,
            p_value: 1.0,
            yates: false,
            table,
        });
    }

    let yates = dof == 1;
    let mut chi2 = 0.0;
    for (obs_row, exp_row) in table.observed.iter().zip(&table.expected) {
        for (&obs, &exp) in obs_row.iter().zip(exp_row) {
            let mut obs = obs as f64;
            if yates {
                let diff = exp - obs;
                obs += diff.signum() * diff.abs().min(0.5);
            }
            chi2 += (obs - exp).powi(2) / exp;
        }
    }

    let dist = ChiSquared::new(dof as f64).map_err(|_| Insufficient::InvalidParameter {
        name: "dof",
        value: dof as f64,
    })?;
    Ok(ChiSquare {
        chi2,
        dof,
        p_value: dist.sf(chi2).min(1.0),
        yates,
        table,
    })
}

fn sorted_labels<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        if !out.contains(label) {
            out.push(label.clone());
        }
    }
    out.sort_by(|a, b| compare_labels(a, b));
    out
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosstab_sorts_labels_and_counts_pairs() {
        let a = Column::from_labels("a", ["10", "9", "9", "10"]);
        let b = Column::from_labels("b", ["y", "x", "y", "y"]);
        let table = ContingencyTable::from_columns(&a, &b);
        assert_eq!(table.row_labels, vec!["9", "10"]);
        assert_eq!(table.column_labels, vec!["x", "y"]);
        assert_eq!(table.observed, vec![vec![1, 1], vec![0, 2]]);
        assert_eq!(table.expected[1][1], 1.5);
    }

    #[test]
    fn single_category_has_zero_dof() {
        let a = Column::from_labels("a", ["x", "x", "x"]);
        let b = Column::from_labels("b", ["p", "q", "p"]);
        let res = chi_square_independence(&a, &b).unwrap();
        assert_eq!(res.dof, 0);
        assert_eq!(res.chi2, 0.0);
        assert_eq!(res.p_value, 1.0);
    }

    #[test]
    fn larger_tables_skip_yates() {
        let a = Column::from_labels("a", ["x", "x", "y", "y", "z", "z"]);
        let b = Column::from_labels("b", ["p", "q", "p", "q", "p", "q"]);
        let res = chi_square_independence(&a, &b).unwrap();
        assert_eq!(res.dof, 2);
        assert!(!res.yates);
        assert!(res.chi2.abs() < 1e-12);
        assert!((res.p_value - 1.0).abs() < 1e-9);
    }
}
