//! Column profile and numeric summaries.

use serde::Serialize;

use insight_model::{Column, ColumnKind, Table};

use crate::sample::{mean, numeric_values, quantile_sorted, std_dev};

/// Kind and completeness of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub present: usize,
}

/// One profile entry per column, in table order.
pub fn profile(table: &Table) -> Vec<ColumnProfile> {
    table
        .columns()
        .iter()
        .map(|column| {
            let missing = column.missing_count();
            ColumnProfile {
                name: column.name().to_string(),
                kind: column.kind(),
                missing,
                present: column.len() - missing,
            }
        })
        .collect()
}

/// Count, mean, spread and quartiles of a column's numeric values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summary of the column's coerced values; `None` when none are numeric.
pub fn describe(column: &Column) -> Option<NumericSummary> {
    let mut values = numeric_values(column);
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(NumericSummary {
        column: column.name().to_string(),
        count: values.len(),
        mean: mean(&values),
        std: std_dev(&values),
        min: values[0],
        q25: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q75: quantile_sorted(&values, 0.75),
        max: values[values.len() - 1],
    })
}

/// Summaries of every numeric column that has at least one value.
pub fn describe_table(table: &Table) -> Vec<NumericSummary> {
    table.numeric_columns().filter_map(describe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_model::ColumnValues;

    #[test]
    fn summary_uses_sample_std_and_interpolated_quartiles() {
        let col = Column::new(
            "amount",
            ColumnValues::Numeric(vec![Some(4.0), None, Some(1.0), Some(3.0), Some(2.0)]),
        );
        let summary = describe(&col).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q25, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q75, 3.25);
        assert_eq!(summary.max, 4.0);
        let std = summary.std.unwrap();
        assert!((std - 1.290_994).abs() < 1e-6);
    }

    #[test]
    fn profile_reports_kinds_and_missing() {
        let table = Table::new(vec![
            Column::new("qty", ColumnValues::Numeric(vec![Some(1.0), None])),
            Column::new("promo", ColumnValues::Boolean(vec![None, None])),
        ])
        .unwrap();
        let profiles = profile(&table);
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        assert_eq!((profiles[0].missing, profiles[0].present), (1, 1));
        assert_eq!(profiles[1].missing, 2);
        assert!(describe_table(&table).len() == 1);
    }
}
