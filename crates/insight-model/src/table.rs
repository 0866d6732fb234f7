//! In-memory tabular dataset.
//!
//! A [`Table`] is an ordered list of named [`Column`]s sharing one row count.
//! Every column carries its values in a [`ColumnValues`] variant chosen once at
//! load time, so downstream code branches on an explicit [`ColumnKind`] tag
//! instead of inspecting values.

#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{ModelError, Result};

/// Tokens accepted as "true" by [`is_truthy_token`].
pub const TRUTHY_TOKENS: [&str; 5] = ["1", "true", "sim", "yes", "y"];

const TIMESTAMP_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kind of values held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Timestamp,
    Text,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Boolean => "Boolean",
            Self::Timestamp => "Timestamp",
            Self::Text => "Text",
        }
    }

    /// True for kinds that are analysed as categories (everything but numeric).
    pub fn is_categorical(self) -> bool {
        !matches!(self, Self::Numeric)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column storage, one variant per [`ColumnKind`]. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values")]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Boolean(_) => ColumnKind::Boolean,
            Self::Timestamp(_) => ColumnKind::Timestamp,
            Self::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Timestamp(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Numeric column with every value present.
    pub fn from_f64s(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            ColumnValues::Numeric(values.into_iter().map(Some).collect()),
        )
    }

    /// Text column with every value present.
    pub fn from_labels<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            ColumnValues::Text(values.into_iter().map(|v| Some(v.into())).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().filter(|x| !x.is_some_and(f64::is_finite)).count(),
            ColumnValues::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Timestamp(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Numeric view of one cell.
    ///
    /// Booleans coerce to 0/1, text is parsed after trimming, timestamps never
    /// coerce. Anything that does not produce a finite number is missing.
    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        let value = match &self.values {
            ColumnValues::Numeric(v) => v.get(row).copied().flatten(),
            ColumnValues::Boolean(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|b| if b { 1.0 } else { 0.0 }),
            ColumnValues::Timestamp(_) => None,
            ColumnValues::Text(v) => v
                .get(row)
                .and_then(Option::as_deref)
                .and_then(|s| s.trim().parse::<f64>().ok()),
        };
        value.filter(|x| x.is_finite())
    }

    /// All cells through [`Self::numeric_at`], keeping row alignment.
    pub fn coerce_numeric(&self) -> Vec<Option<f64>> {
        (0..self.len()).map(|row| self.numeric_at(row)).collect()
    }

    /// Categorical label of one cell. Missing and blank text cells are `None`.
    pub fn label_at(&self, row: usize) -> Option<String> {
        match &self.values {
            ColumnValues::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .filter(|x| x.is_finite())
                .map(format_label_number),
            ColumnValues::Boolean(v) => v.get(row).copied().flatten().map(|b| b.to_string()),
            ColumnValues::Timestamp(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|ts| ts.format(TIMESTAMP_LABEL_FORMAT).to_string()),
            ColumnValues::Text(v) => v
                .get(row)
                .and_then(Option::as_deref)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
        }
    }

    /// Distinct non-missing labels in first-seen order.
    pub fn distinct_labels(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for row in 0..self.len() {
            if let Some(label) = self.label_at(row)
                && seen.insert(label.clone())
            {
                ordered.push(label);
            }
        }
        ordered
    }

    /// Per-row promotion flag using [`is_truthy_token`]. Missing is false.
    pub fn truthy_mask(&self) -> Vec<bool> {
        (0..self.len())
            .map(|row| match &self.values {
                ColumnValues::Boolean(v) => v.get(row).copied().flatten().unwrap_or(false),
                ColumnValues::Numeric(v) => v.get(row).copied().flatten() == Some(1.0),
                ColumnValues::Timestamp(_) => false,
                ColumnValues::Text(v) => v
                    .get(row)
                    .and_then(Option::as_deref)
                    .is_some_and(is_truthy_token),
            })
            .collect()
    }
}

/// Literal truthy-token check used for flag columns such as `tem_promocao`.
///
/// Only the tokens in [`TRUTHY_TOKENS`] count, compared case-insensitively
/// after trimming. Any other non-missing value is false.
pub fn is_truthy_token(raw: &str) -> bool {
    let token = raw.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&token.as_str())
}

fn format_label_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Ordered collection of equally sized, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut names = BTreeSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(ModelError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(ModelError::RaggedColumns {
                    column: column.name().to_string(),
                    expected: row_count,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| ModelError::ColumnNotFound(name.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind().is_categorical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::from_f64s("a", [1.0, 2.0]),
            Column::from_f64s("b", [1.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::RaggedColumns {
                column: "b".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::from_f64s("a", [1.0]),
            Column::from_labels("a", ["x"]),
        ])
        .unwrap_err();
        assert_eq!(err, ModelError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn text_coerces_to_numbers_where_possible() {
        let column = Column::new(
            "v",
            ColumnValues::Text(vec![
                Some(" 1.5 ".to_string()),
                Some("abc".to_string()),
                None,
                Some("NaN".to_string()),
            ]),
        );
        assert_eq!(column.coerce_numeric(), vec![Some(1.5), None, None, None]);
    }

    #[test]
    fn distinct_labels_keep_first_seen_order() {
        let column = Column::new(
            "g",
            ColumnValues::Text(vec![
                Some("B".to_string()),
                Some("A".to_string()),
                None,
                Some("B".to_string()),
                Some("  ".to_string()),
            ]),
        );
        assert_eq!(column.distinct_labels(), vec!["B", "A"]);
    }

    #[test]
    fn numeric_labels_drop_integral_fraction() {
        let column = Column::from_f64s("n", [1.0, 2.5]);
        assert_eq!(column.label_at(0).as_deref(), Some("1"));
        assert_eq!(column.label_at(1).as_deref(), Some("2.5"));
    }

    #[test]
    fn truthy_mask_only_accepts_literal_tokens() {
        let column = Column::new(
            "promo",
            ColumnValues::Text(vec![
                Some("Sim".to_string()),
                Some("no".to_string()),
                None,
                Some(" Y ".to_string()),
                Some("promo".to_string()),
            ]),
        );
        assert_eq!(column.truthy_mask(), vec![true, false, false, true, false]);
    }
}
