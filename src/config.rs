//! Configuration for locating and indexing the fashionNet data.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dataset::Subset;
use crate::utils::error::{FashionNetError, Result};

/// Directory under `data_path` that holds both subsets
pub const DATASET_DIR: &str = "fashionNet";

/// Data location and indexing behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root data directory containing `fashionNet/`
    pub data_path: PathBuf,
    /// Treat a missing subset directory as an error instead of an empty dataset
    pub strict: bool,
    /// Draw a progress bar while indexing
    pub show_progress: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data"),
            strict: false,
            show_progress: true,
        }
    }
}

impl DataConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// `<data_path>/fashionNet/images_<subset>`
    pub fn subset_root(&self, subset: Subset) -> PathBuf {
        self.data_path
            .join(DATASET_DIR)
            .join(format!("images_{}", subset))
    }
}

/// Read and deserialize a TOML configuration file
pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path).map_err(|e| {
        FashionNetError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        FashionNetError::Config(format!("Failed to parse config {}: {e}", path.display()))
    })
}
