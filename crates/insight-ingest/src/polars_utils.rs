//! Polars interop.
//!
//! Conversion of Polars frames into [`Table`]s plus helpers for working with
//! `AnyValue`. A column's kind comes from its dtype, checked in the order
//! numeric, boolean, temporal, then text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{AnyValue, DataFrame, DataType, TimeUnit};

use insight_model::{Column, ColumnKind, ColumnValues, Table};

use crate::error::Result;

/// Converts a Polars AnyValue to a String representation.
/// Returns `None` for Null, formats numbers without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) => Some(format_numeric(f64::from(v))),
        AnyValue::Float64(v) => Some(format_numeric(v)),
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Boolean(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
    .filter(|v| !v.is_nan())
}

/// Converts a temporal AnyValue to a naive timestamp.
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(i64::from(days))))
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        AnyValue::Datetime(v, unit, _) | AnyValue::DatetimeOwned(v, unit, _) => {
            let utc = match unit {
                TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
                TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
                TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
            };
            utc.map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Kind a Polars dtype maps to.
pub fn kind_for_dtype(dtype: &DataType) -> ColumnKind {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => ColumnKind::Numeric,
        DataType::Boolean => ColumnKind::Boolean,
        DataType::Date | DataType::Datetime(_, _) => ColumnKind::Timestamp,
        _ => ColumnKind::Text,
    }
}

/// Builds a [`Table`] from a Polars frame, keeping column order.
pub fn table_from_dataframe(df: &DataFrame) -> Result<Table> {
    let height = df.height();
    let mut columns = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let cell = |row: usize| col.get(row).unwrap_or(AnyValue::Null);
        let values = match kind_for_dtype(col.dtype()) {
            ColumnKind::Numeric => {
                ColumnValues::Numeric((0..height).map(|row| any_to_f64(cell(row))).collect())
            }
            ColumnKind::Boolean => ColumnValues::Boolean(
                (0..height)
                    .map(|row| match cell(row) {
                        AnyValue::Boolean(b) => Some(b),
                        _ => None,
                    })
                    .collect(),
            ),
            ColumnKind::Timestamp => ColumnValues::Timestamp(
                (0..height).map(|row| any_to_datetime(cell(row))).collect(),
            ),
            ColumnKind::Text => {
                ColumnValues::Text((0..height).map(|row| any_to_string(cell(row))).collect())
            }
        };
        columns.push(Column::new(col.name().to_string(), values));
    }
    Ok(Table::new(columns)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn dataframe_columns_keep_dtype_kinds() {
        let df = DataFrame::new(vec![
            Series::new("amount".into(), &[1.5f64, 2.0]).into_column(),
            Series::new("qty".into(), &[Some(1i64), None]).into_column(),
            Series::new("promo".into(), &[true, false]).into_column(),
            Series::new("region".into(), &["N", "S"]).into_column(),
        ])
        .unwrap();

        let table = table_from_dataframe(&df).unwrap();
        let kinds: Vec<ColumnKind> = table.columns().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Numeric,
                ColumnKind::Boolean,
                ColumnKind::Text
            ]
        );
        let qty = table.column("qty").unwrap();
        assert_eq!(qty.coerce_numeric(), vec![Some(1.0), None]);
    }

    #[test]
    fn formats_numbers_without_trailing_zeros() {
        assert_eq!(format_numeric(2.50), "2.5");
        assert_eq!(format_numeric(3.0), "3");
        assert_eq!(format_numeric(100.0), "100");
    }
}
