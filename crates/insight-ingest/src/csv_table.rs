use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::debug;

use insight_model::{Column, ColumnKind, ColumnValues, Table};

use crate::error::{IngestError, Result};

/// Cell contents treated as missing, compared after trimming.
pub const MISSING_TOKENS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// CSV contents before typing: header names and raw cells.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Renames repeated headers to `name.1`, `name.2`, ... and fills blanks.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        out.push(candidate);
    }
    out
}

/// Reads a CSV file as strings. The first non-blank record is the header row.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let csv_error = |source| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut raw_rows = raw_rows.into_iter();
    let Some(header_row) = raw_rows.next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let headers = dedupe_headers(header_row.iter().map(|h| normalize_header(h)).collect());
    let rows = raw_rows
        .map(|record| {
            (0..headers.len())
                .map(|idx| record.get(idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Ok(CsvTable { headers, rows })
}

/// Reads a CSV file and types each column by probing its cells.
pub fn read_csv(path: &Path) -> Result<Table> {
    let raw = read_csv_table(path)?;
    let table = table_from_csv(&raw)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.width(),
        "csv loaded"
    );
    Ok(table)
}

/// Types the columns of a raw CSV table.
pub fn table_from_csv(raw: &CsvTable) -> Result<Table> {
    let columns = raw
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cells: Vec<Option<&str>> = raw
                .rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).filter(|v| !is_missing(v)))
                .collect();
            Column::new(header.clone(), typed_values(&cells))
        })
        .collect();
    Ok(Table::new(columns)?)
}

pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// Kind of a column of raw cells (`None` = missing).
///
/// Probed in order numeric, boolean, timestamp, text; a kind is chosen when
/// every present cell parses as it. An all-missing column is numeric.
pub fn probe_kind(cells: &[Option<&str>]) -> ColumnKind {
    let present = || cells.iter().flatten();
    if present().all(|v| parse_number(v).is_some()) {
        ColumnKind::Numeric
    } else if present().all(|v| parse_bool(v).is_some()) {
        ColumnKind::Boolean
    } else if present().all(|v| parse_timestamp(v).is_some()) {
        ColumnKind::Timestamp
    } else {
        ColumnKind::Text
    }
}

fn typed_values(cells: &[Option<&str>]) -> ColumnValues {
    match probe_kind(cells) {
        ColumnKind::Numeric => {
            ColumnValues::Numeric(cells.iter().map(|c| c.and_then(parse_number)).collect())
        }
        ColumnKind::Boolean => {
            ColumnValues::Boolean(cells.iter().map(|c| c.and_then(parse_bool)).collect())
        }
        ColumnKind::Timestamp => {
            ColumnValues::Timestamp(cells.iter().map(|c| c.and_then(parse_timestamp)).collect())
        }
        ColumnKind::Text => {
            ColumnValues::Text(cells.iter().map(|c| c.map(str::to_string)).collect())
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
