//! Dataset loading for the analysis core.
//!
//! Reads CSV and Parquet files into [`insight_model::Table`]s. CSV columns
//! are typed by probing their cells; Parquet columns keep their dtype.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod polars_utils;

pub use csv_table::{
    CsvTable, MISSING_TOKENS, is_missing, probe_kind, read_csv, read_csv_table, table_from_csv,
};
pub use discovery::{
    DEFAULT_DATASET_NAME, DatasetFormat, SUPPORTED_EXTENSIONS, find_default_dataset,
    list_datasets, load_table,
};
pub use error::{IngestError, Result};
pub use polars_utils::{
    any_to_datetime, any_to_f64, any_to_string, format_numeric, kind_for_dtype, parse_f64,
    table_from_dataframe,
};
