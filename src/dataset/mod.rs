//! Dataset module for fashionNet data handling
//!
//! This module provides functionality for:
//! - Indexing a subset directory into `(subset, class_name, filepath)` records
//! - Mapping class names to dense ids in sort order
//! - Serving preprocessed `(image, class_id)` pairs
//! - Feeding those pairs to Burn's data loading
//!
//! ## Directory Layout
//!
//! ```text
//! <data_path>/fashionNet/
//! ├── images_background/
//! │   ├── <class_name>/
//! │   │   ├── 0001.jpg
//! │   │   └── ...
//! │   └── ...
//! └── images_evaluation/
//!     └── <class_name>/...
//! ```

pub mod burn_dataset;
pub mod fashion_net;
pub mod index;
pub mod registry;
pub mod transform;

// Re-export main types for convenience
pub use burn_dataset::{FashionNetBatch, FashionNetBatcher, FashionNetItem};
pub use fashion_net::{load_rgb, DatasetStats, FashionNetDataset, IndexedRecord};
pub use index::{index_subset, Record, Subset};
pub use registry::ClassRegistry;
pub use transform::{
    default_pipeline, CenterCrop, Chain, ImageTensor, Normalize, Pipeline, Resize, ToTensor,
    Transform,
};
