//! Subset indexing
//!
//! Walks `<data_path>/fashionNet/images_<subset>/` and records every `.jpg`
//! file together with the name of the directory that contains it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::DataConfig;
use crate::utils::error::{FashionNetError, Result};
use crate::utils::format_duration;
use crate::utils::logging::counted_progress_bar;

/// Extension (case-sensitive) of the files that make up the dataset
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Partition of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subset {
    /// Training / support classes
    Background,
    /// Held-out classes
    Evaluation,
}

impl Subset {
    pub const ALL: [Subset; 2] = [Subset::Background, Subset::Evaluation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subset::Background => "background",
            Subset::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subset {
    type Err = FashionNetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "background" => Ok(Subset::Background),
            "evaluation" => Ok(Subset::Evaluation),
            other => Err(FashionNetError::InvalidArgument(format!(
                "subset must be one of (background, evaluation), got '{}'",
                other
            ))),
        }
    }
}

/// One indexed image file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub subset: Subset,
    /// Name of the file's immediate parent directory
    pub class_name: String,
    pub filepath: PathBuf,
}

/// Index every image of `subset` under `config.data_path`.
///
/// Two passes over the tree: the first counts matching files so the progress
/// bar has a length, the second builds the records. Entries are visited in
/// file-name order, so an unchanged tree always yields the same sequence.
///
/// A missing subset directory yields no records, unless `config.strict` is
/// set, in which case it is reported as [`FashionNetError::PathNotFound`].
pub fn index_subset(config: &DataConfig, subset: Subset) -> Result<Vec<Record>> {
    let root = config.subset_root(subset);
    info!("Indexing {}...", subset);

    if !root.is_dir() {
        if config.strict {
            return Err(FashionNetError::PathNotFound(root));
        }
        warn!("Subset directory {:?} does not exist, indexing zero images", root);
        return Ok(Vec::new());
    }

    let start = Instant::now();
    let total = image_files(&root).count();
    let pb = counted_progress_bar(total as u64, config.show_progress);

    let mut records = Vec::with_capacity(total);
    for filepath in image_files(&root) {
        pb.inc(1);
        if let Some(class_name) = class_name_of(&filepath) {
            records.push(Record {
                subset,
                class_name,
                filepath,
            });
        }
    }
    pb.finish_and_clear();

    info!(
        "Indexed {} images of subset '{}' in {}",
        records.len(),
        subset,
        format_duration(start.elapsed())
    );

    Ok(records)
}

/// Image files inside class directories below `root`.
///
/// Depth 1 entries are the class directories themselves, so files lying
/// directly in `root` are never returned. Unreadable entries are skipped.
fn image_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .min_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file() && has_image_extension(entry.path()))
        .map(|entry| entry.into_path())
}

fn has_image_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(IMAGE_EXTENSION))
        .unwrap_or(false)
}

fn class_name_of(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
}
