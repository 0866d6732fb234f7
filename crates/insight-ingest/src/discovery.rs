//! Dataset discovery and format dispatch.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{ParquetReader, SerReader};
use tracing::{debug, info};

use insight_model::Table;

use crate::csv_table::read_csv;
use crate::error::{IngestError, Result};
use crate::polars_utils::table_from_dataframe;

/// File stem of the dataset loaded when none is named.
pub const DEFAULT_DATASET_NAME: &str = "df_selecionado";

/// Supported formats, in the order the default lookup tries them.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "parquet"];

/// On-disk format of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Parquet,
}

impl DatasetFormat {
    /// Format for a path, from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Loads a CSV or Parquet file into a typed table.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let table = match DatasetFormat::from_path(path)? {
        DatasetFormat::Csv => read_csv(path)?,
        DatasetFormat::Parquet => read_parquet(path)?,
    };
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.width(),
        "dataset loaded"
    );
    Ok(table)
}

fn read_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| IngestError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::Polars {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    table_from_dataframe(&df)
}

/// Finds `df_selecionado.csv` or `df_selecionado.parquet` in `dir`.
///
/// CSV wins when both exist.
pub fn find_default_dataset(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{DEFAULT_DATASET_NAME}.{ext}")))
        .find(|candidate| candidate.is_file())
        .inspect(|path| debug!(path = %path.display(), "default dataset found"))
        .ok_or_else(|| IngestError::NoDefaultDataset {
            dir: dir.to_path_buf(),
            base_name: DEFAULT_DATASET_NAME.to_string(),
        })
}

/// Lists loadable dataset files in a directory, sorted by file name.
pub fn list_datasets(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && DatasetFormat::from_path(&path).is_ok() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
