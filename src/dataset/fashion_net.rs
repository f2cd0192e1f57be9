//! fashionNet dataset accessor
//!
//! Builds an indexed table over one subset and serves `(image, class_id)`
//! pairs, decoding and preprocessing the image on every access.

use std::collections::BTreeMap;
use std::path::Path;

use image::{ImageReader, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::index::{index_subset, Record, Subset};
use super::registry::ClassRegistry;
use super::transform::{default_pipeline, ImageTensor, Pipeline, Transform};
use crate::config::DataConfig;
use crate::utils::error::{FashionNetError, Result};
use crate::utils::format_number;

/// A record with its position in the table and its class id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedRecord {
    /// Dense 0-based row id, stable only within one construction
    pub id: usize,
    pub record: Record,
    pub class_id: usize,
}

/// One subset of the fashionNet dataset.
///
/// The table is built once, by fully walking the subset directory, and is
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct FashionNetDataset<T = Pipeline> {
    subset: Subset,
    rows: Vec<IndexedRecord>,
    classes: ClassRegistry,
    transform: T,
}

impl FashionNetDataset<Pipeline> {
    /// Index `subset` under `config.data_path` and build the table
    pub fn new(config: &DataConfig, subset: Subset) -> Result<Self> {
        info!(
            "Loading fashionNet '{}' subset from: {:?}",
            subset, config.data_path
        );
        let records = index_subset(config, subset)?;
        Ok(Self::from_records(subset, records))
    }

    /// Like [`FashionNetDataset::new`], validating the subset name first.
    ///
    /// An unknown name fails with [`FashionNetError::InvalidArgument`] before
    /// the filesystem is touched.
    pub fn from_subset_name(config: &DataConfig, subset: &str) -> Result<Self> {
        let subset: Subset = subset.parse()?;
        Self::new(config, subset)
    }

    /// Build the table from already indexed records
    pub fn from_records(subset: Subset, records: Vec<Record>) -> Self {
        let classes = ClassRegistry::from_names(records.iter().map(|r| r.class_name.as_str()));

        let rows: Vec<IndexedRecord> = records
            .into_iter()
            .enumerate()
            .filter_map(|(id, record)| {
                let class_id = classes.id(&record.class_name)?;
                Some(IndexedRecord {
                    id,
                    record,
                    class_id,
                })
            })
            .collect();

        info!(
            "Subset '{}': {} images in {} classes",
            subset,
            rows.len(),
            classes.len()
        );

        Self {
            subset,
            rows,
            classes,
            transform: default_pipeline(),
        }
    }
}

impl<T> FashionNetDataset<T> {
    /// Replace the preprocessing pipeline
    pub fn with_transform<U>(self, transform: U) -> FashionNetDataset<U> {
        FashionNetDataset {
            subset: self.subset,
            rows: self.rows,
            classes: self.classes,
            transform,
        }
    }

    pub fn subset(&self) -> Subset {
        self.subset
    }

    /// Number of indexed images
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct class names
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn rows(&self) -> &[IndexedRecord] {
        &self.rows
    }

    pub fn class_registry(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Class names ordered by class id
    pub fn class_names(&self) -> &[String] {
        self.classes.names()
    }

    pub fn class_id_of(&self, class_name: &str) -> Option<usize> {
        self.classes.id(class_name)
    }

    /// Row id → image path
    pub fn filepath(&self, id: usize) -> Option<&Path> {
        self.rows.get(id).map(|row| row.record.filepath.as_path())
    }

    /// Row id → class id
    pub fn class_id(&self, id: usize) -> Option<usize> {
        self.rows.get(id).map(|row| row.class_id)
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Get statistics about the dataset
    pub fn stats(&self) -> DatasetStats {
        let mut class_counts = vec![0usize; self.num_classes()];
        for row in &self.rows {
            class_counts[row.class_id] += 1;
        }

        let class_counts: BTreeMap<String, usize> = self
            .class_names()
            .iter()
            .cloned()
            .zip(class_counts)
            .collect();

        for (name, count) in &class_counts {
            debug!("Class '{}': {} images", name, count);
        }

        DatasetStats {
            subset: self.subset,
            total_samples: self.len(),
            num_classes: self.num_classes(),
            class_counts,
        }
    }
}

impl<T> FashionNetDataset<T>
where
    T: Transform<RgbImage, Output = ImageTensor>,
{
    /// Decode, preprocess and label the image with row id `index`
    pub fn item(&self, index: usize) -> Result<(ImageTensor, usize)> {
        let row = self
            .rows
            .get(index)
            .ok_or(FashionNetError::IndexOutOfBounds {
                index,
                len: self.rows.len(),
            })?;

        let image = load_rgb(&row.record.filepath)?;
        Ok((self.transform.apply(image), row.class_id))
    }
}

/// Open and decode an image file as 8-bit RGB
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = ImageReader::open(path)
        .map_err(|e| FashionNetError::ImageLoad(path.to_path_buf(), e.to_string()))?
        .with_guessed_format()
        .map_err(|e| FashionNetError::ImageLoad(path.to_path_buf(), e.to_string()))?
        .decode()
        .map_err(|e| FashionNetError::ImageLoad(path.to_path_buf(), e.to_string()))?;

    Ok(image.to_rgb8())
}

/// Statistics about one subset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub subset: Subset,
    pub total_samples: usize,
    pub num_classes: usize,
    /// Images per class, keyed by class name
    pub class_counts: BTreeMap<String, usize>,
}

impl DatasetStats {
    /// Print statistics to console
    pub fn print(&self) {
        println!("\nDataset statistics ({}):", self.subset);
        println!("  Total samples: {}", format_number(self.total_samples));
        println!("  Number of classes: {}", self.num_classes);
        println!("\n  Samples per class:");

        for (idx, (name, count)) in self.class_counts.iter().enumerate() {
            let bar_len = if self.total_samples > 0 {
                (*count as f32 / self.total_samples as f32 * 40.0) as usize
            } else {
                0
            };
            println!("    {:3}. {:30} {:5} {}", idx, name, count, "█".repeat(bar_len));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use image::Rgb;
    use tempfile::TempDir;

    fn record(class_name: &str, file: &str) -> Record {
        Record {
            subset: Subset::Background,
            class_name: class_name.to_string(),
            filepath: PathBuf::from(format!("/data/{}/{}", class_name, file)),
        }
    }

    fn create_test_image(path: &Path, width: u32, height: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 77]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_from_records_assigns_sorted_class_ids() {
        let dataset = FashionNetDataset::from_records(
            Subset::Background,
            vec![record("b", "1.jpg"), record("a", "2.jpg"), record("c", "3.jpg"), record("a", "4.jpg")],
        );

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.num_classes(), 3);
        assert_eq!(dataset.class_id_of("a"), Some(0));
        assert_eq!(dataset.class_id_of("b"), Some(1));
        assert_eq!(dataset.class_id_of("c"), Some(2));

        let class_ids: Vec<usize> = (0..dataset.len()).map(|i| dataset.class_id(i).unwrap()).collect();
        assert_eq!(class_ids, vec![1, 0, 2, 0]);
    }

    #[test]
    fn test_row_ids_are_dense_positions() {
        let dataset = FashionNetDataset::from_records(
            Subset::Evaluation,
            vec![record("x", "1.jpg"), record("y", "2.jpg"), record("x", "3.jpg")],
        );

        for (pos, row) in dataset.rows().iter().enumerate() {
            assert_eq!(row.id, pos);
            assert_eq!(dataset.filepath(pos), Some(row.record.filepath.as_path()));
        }
        assert_eq!(dataset.filepath(3), None);
        assert_eq!(dataset.class_id(3), None);
    }

    #[test]
    fn test_stats_counts_per_class() {
        let dataset = FashionNetDataset::from_records(
            Subset::Background,
            vec![record("shoe", "1.jpg"), record("bag", "2.jpg"), record("shoe", "3.jpg")],
        );

        let stats = dataset.stats();
        assert_eq!(stats.total_samples, 3);
        assert_eq!(stats.num_classes, 2);
        assert_eq!(stats.class_counts["shoe"], 2);
        assert_eq!(stats.class_counts["bag"], 1);
    }

    #[test]
    fn test_item_out_of_bounds() {
        let dataset = FashionNetDataset::from_records(Subset::Background, vec![record("a", "1.jpg")]);
        let result = dataset.item(1);
        assert!(matches!(
            result,
            Err(FashionNetError::IndexOutOfBounds { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_item_missing_file() {
        let dataset = FashionNetDataset::from_records(Subset::Background, vec![record("a", "missing.jpg")]);
        let result = dataset.item(0);
        assert!(matches!(result, Err(FashionNetError::ImageLoad(_, _))));
    }

    #[test]
    fn test_item_transforms_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coat/0.jpg");
        create_test_image(&path, 105, 64);

        let dataset = FashionNetDataset::from_records(
            Subset::Background,
            vec![Record {
                subset: Subset::Background,
                class_name: "coat".to_string(),
                filepath: path,
            }],
        );

        let (tensor, label) = dataset.item(0).unwrap();
        assert_eq!(tensor.shape(), [3, 28, 28]);
        assert_eq!(label, 0);
    }

    #[test]
    fn test_with_transform_swaps_pipeline() {
        use crate::dataset::transform::{Resize, ToTensor};

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hat/0.png");
        create_test_image(&path, 20, 20);

        let dataset = FashionNetDataset::from_records(
            Subset::Evaluation,
            vec![Record {
                subset: Subset::Evaluation,
                class_name: "hat".to_string(),
                filepath: path,
            }],
        )
        .with_transform(Resize::exact(8, 4).then(ToTensor));

        let (tensor, _) = dataset.item(0).unwrap();
        assert_eq!(tensor.shape(), [3, 4, 8]);
        let (lo, hi) = tensor.min_max().unwrap();
        assert!(lo >= 0.0 && hi <= 1.0);
    }
}
