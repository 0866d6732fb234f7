//! Error types for dataset loading.

use std::path::PathBuf;
use thiserror::Error;

use insight_model::ModelError;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Dataset file not found.
    #[error("dataset file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Directory does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory contents.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open a file.
    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No default dataset in the searched directory.
    #[error("no default dataset `{base_name}.{{csv,parquet}}` in {dir}")]
    NoDefaultDataset { dir: PathBuf, base_name: String },

    /// File extension is not a supported format.
    #[error("unsupported dataset format `{extension}`: {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Failed to read or parse a CSV file.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Failed to read a file with Polars.
    #[error("failed to read {path}: {message}")]
    Polars { path: PathBuf, message: String },

    /// The loaded columns do not form a valid table.
    #[error("invalid table: {0}")]
    Model(#[from] ModelError),
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
