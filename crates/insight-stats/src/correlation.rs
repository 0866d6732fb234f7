//! Pearson correlation, the correlation matrix and the least-squares trend line.

use serde::Serialize;

use insight_model::{Column, Table};

use crate::outcome::{Insufficient, TestOutcome};
use crate::sample::{paired_values, require_len, t_two_sided};

/// Pearson correlation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pearson {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

struct Moments {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

fn moments(pairs: &[(f64, f64)]) -> Moments {
    let n = pairs.len();
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    Moments {
        n,
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    }
}

fn correlation(m: &Moments) -> Option<f64> {
    if m.sxx == 0.0 || m.syy == 0.0 {
        return None;
    }
    Some((m.sxy / (m.sxx * m.syy).sqrt()).clamp(-1.0, 1.0))
}

/// Two-sided Pearson correlation over rows where both columns are numeric.
pub fn pearson(x: &Column, y: &Column) -> TestOutcome<Pearson> {
    let pairs = paired_values(x, y);
    require_len(pairs.len(), 3)?;
    let m = moments(&pairs);
    let r = correlation(&m).ok_or(Insufficient::ZeroVariance)?;
    let p_value = if r.abs() >= 1.0 {
        0.0
    } else {
        let df = (m.n - 2) as f64;
        t_two_sided(r * (df / (1.0 - r * r)).sqrt(), df)?
    };
    Ok(Pearson {
        r,
        p_value,
        n: m.n,
    })
}

/// Pairwise-complete Pearson r between every pair of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is r between `columns[i]` and `columns[j]`, `None` where
    /// undefined (fewer than two pairs or no spread).
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<&Column> = table.numeric_columns().collect();
    let mut values = vec![vec![None; numeric.len()]; numeric.len()];
    for (i, x) in numeric.iter().enumerate() {
        values[i][i] = Some(1.0);
        for (j, y) in numeric.iter().enumerate().skip(i + 1) {
            let pairs = paired_values(x, y);
            let r = if pairs.len() < 2 {
                None
            } else {
                correlation(&moments(&pairs))
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    }
}

/// Least-squares line `y = slope · x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
}

impl LinearTrend {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a degree-one least-squares line over complete pairs.
pub fn linear_trend(x: &Column, y: &Column) -> TestOutcome<LinearTrend> {
    let pairs = paired_values(x, y);
    require_len(pairs.len(), 2)?;
    let m = moments(&pairs);
    if m.sxx == 0.0 {
        return Err(Insufficient::ZeroVariance);
    }
    let slope = m.sxy / m.sxx;
    Ok(LinearTrend {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
        n: m.n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_model::ColumnValues;

    #[test]
    fn pearson_known_value() {
        let x = Column::from_f64s("x", [1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = Column::from_f64s("y", [2.0, 4.0, 5.0, 4.0, 5.0]);
        let res = pearson(&x, &y).unwrap();
        assert!((res.r - 0.774_597).abs() < 1e-6);
        assert!((res.p_value - 0.124_03).abs() < 1e-3);
        assert_eq!(res.n, 5);
    }

    #[test]
    fn pearson_needs_three_pairs() {
        let x = Column::from_f64s("x", [1.0, 2.0]);
        let y = Column::from_f64s("y", [2.0, 1.0]);
        assert_eq!(
            pearson(&x, &y),
            Err(Insufficient::TooFewObservations {
                required: 3,
                found: 2
            })
        );
    }

    #[test]
    fn matrix_skips_text_and_marks_undefined_pairs() {
        let table = Table::new(vec![
            Column::from_f64s("a", [1.0, 2.0, 3.0]),
            Column::from_labels("label", ["x", "y", "z"]),
            Column::from_f64s("b", [3.0, 2.0, 1.0]),
            Column::from_f64s("flat", [4.0, 4.0, 4.0]),
            Column::new("sparse", ColumnValues::Numeric(vec![Some(1.0), None, None])),
        ])
        .unwrap();
        let matrix = correlation_matrix(&table);
        assert_eq!(matrix.columns, vec!["a", "b", "flat", "sparse"]);
        assert_eq!(matrix.get("a", "b"), Some(-1.0));
        assert_eq!(matrix.get("b", "a"), Some(-1.0));
        assert_eq!(matrix.get("a", "flat"), None);
        assert_eq!(matrix.get("a", "sparse"), None);
        assert_eq!(matrix.get("flat", "flat"), Some(1.0));
    }

    #[test]
    fn trend_fits_exact_line() {
        let x = Column::from_f64s("x", [0.0, 1.0, 2.0, 3.0]);
        let y = Column::from_f64s("y", [1.0, 3.0, 5.0, 7.0]);
        let trend = linear_trend(&x, &y).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 1.0).abs() < 1e-12);
        assert!((trend.predict(10.0) - 21.0).abs() < 1e-9);
    }
}
