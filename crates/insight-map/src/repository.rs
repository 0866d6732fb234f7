//! Role map repository for persisting and reusing role assignments.
//!
//! Role maps are stored as JSON files named `{dataset}.roles.json`, so pinned
//! choices survive between runs on the same dataset. Keys are the role names
//! (`data_pedido`, `valor_pedido`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use insight_model::RoleMap;

const FILE_SUFFIX: &str = ".roles.json";

/// Repository for storing and retrieving role maps.
#[derive(Debug, Clone)]
pub struct RoleMapRepository {
    /// Base directory for storing role map files.
    base_dir: PathBuf,
}

/// Metadata about a stored role map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMapMetadata {
    /// Dataset identifier.
    pub dataset: String,
    /// File path where the map is stored.
    pub file_path: PathBuf,
    /// Number of bound roles.
    pub role_count: usize,
    /// Timestamp of the last save, if recorded.
    pub saved_at: Option<String>,
}

/// Role map with repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRoleMap {
    /// Dataset identifier this map belongs to.
    pub dataset: String,
    /// The role assignments.
    pub roles: RoleMap,
    /// RFC 3339 timestamp of when this map was saved.
    pub saved_at: Option<String>,
    /// Version of the file format.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredRoleMap {
    pub fn new(dataset: impl Into<String>, roles: RoleMap) -> Self {
        Self {
            dataset: dataset.into(),
            roles,
            saved_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            version: default_version(),
        }
    }
}

impl RoleMapRepository {
    /// Create a repository at the given directory, creating it if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create role map repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save the role map for a dataset, replacing any previous one.
    pub fn save(&self, dataset: &str, roles: &RoleMap) -> Result<PathBuf> {
        let stored = StoredRoleMap::new(dataset, roles.clone());
        let path = self.path_for(dataset);
        let json = serde_json::to_string_pretty(&stored)
            .with_context(|| format!("Failed to serialize role map for {dataset}"))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write role map to {}", path.display()))?;
        Ok(path)
    }

    /// Load the role map for a dataset. Returns `None` if none is stored.
    pub fn load(&self, dataset: &str) -> Result<Option<RoleMap>> {
        Ok(self.load_stored(dataset)?.map(|s| s.roles))
    }

    /// Load the stored document (with metadata) for a dataset.
    pub fn load_stored(&self, dataset: &str) -> Result<Option<StoredRoleMap>> {
        let path = self.path_for(dataset);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read role map from {}", path.display()))?;
        let stored: StoredRoleMap = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse role map from {}", path.display()))?;
        Ok(Some(stored))
    }

    /// List stored role maps, sorted by dataset. Unparseable files are skipped.
    pub fn list(&self) -> Result<Vec<RoleMapMetadata>> {
        let mut metadata = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let path = entry?.path();
            let is_role_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(FILE_SUFFIX));
            if !path.is_file() || !is_role_file {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            if let Ok(stored) = serde_json::from_str::<StoredRoleMap>(&contents) {
                metadata.push(RoleMapMetadata {
                    dataset: stored.dataset,
                    file_path: path,
                    role_count: stored.roles.len(),
                    saved_at: stored.saved_at,
                });
            }
        }
        metadata.sort_by(|a, b| a.dataset.cmp(&b.dataset));
        Ok(metadata)
    }

    /// Delete the stored role map for a dataset.
    pub fn delete(&self, dataset: &str) -> Result<bool> {
        let path = self.path_for(dataset);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete role map: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, dataset: &str) -> bool {
        self.path_for(dataset).exists()
    }

    fn path_for(&self, dataset: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}{FILE_SUFFIX}", normalize_id(dataset)))
    }
}

/// Dataset identifier derived from a file path (its stem).
pub fn dataset_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map_or_else(|| "dataset".to_string(), str::to_string)
}

/// Normalize an ID for use in filenames.
fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
