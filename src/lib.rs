//! # fashionNet Few-Shot Data
//!
//! Dataset indexing, preprocessing and batch metrics for few-shot image
//! classification on the fashionNet dataset, built on the Burn framework.
//!
//! ## Modules
//!
//! - `dataset`: subset indexing, class registry, preprocessing pipeline, Burn dataset/batcher
//! - `config`: data location and indexing options
//! - `backend`: default Burn backend selection
//! - `utils`: error type, logging, categorical accuracy
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fashionnet_fewshot::{DataConfig, FashionNetDataset};
//!
//! let config = DataConfig::new("data");
//! let dataset = FashionNetDataset::from_subset_name(&config, "background")?;
//! let (image, class_id) = dataset.item(0)?;
//! assert_eq!(image.shape(), [3, 28, 28]);
//! ```

pub mod backend;
pub mod config;
pub mod dataset;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::{load_toml_config, DataConfig};
pub use dataset::{
    default_pipeline, index_subset, ClassRegistry, FashionNetBatch, FashionNetBatcher,
    FashionNetDataset, FashionNetItem, ImageTensor, Record, Subset, Transform,
};
pub use utils::error::{FashionNetError, Result};
pub use utils::metrics::{categorical_accuracy, named_metric, METRIC_NAMES};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
