//! Burn Dataset Integration for fashionNet
//!
//! Implements Burn's Dataset trait for [`FashionNetDataset`] and a Batcher
//! that stacks preprocessed items into image and target tensors.

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::prelude::*;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::fashion_net::FashionNetDataset;
use super::transform::{ImageTensor, Transform, CHANNELS};

/// A single fashionNet item ready for Burn
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FashionNetItem {
    /// Preprocessed image as flattened CHW float array
    pub image: Vec<f32>,
    /// Height of the image in `image`
    pub height: usize,
    /// Width of the image in `image`
    pub width: usize,
    /// Class id
    pub label: usize,
    /// Image path (for debugging/logging)
    pub path: String,
}

impl FashionNetItem {
    pub fn new(tensor: ImageTensor, label: usize, path: String) -> Self {
        let [_, height, width] = tensor.shape();
        Self {
            image: tensor.into_data(),
            height,
            width,
            label,
            path,
        }
    }
}

impl<T> Dataset<FashionNetItem> for FashionNetDataset<T>
where
    T: Transform<RgbImage, Output = ImageTensor> + Send + Sync,
{
    /// `None` only past the end of the table.
    ///
    /// Burn's iterators stop at the first `None`, so an image that cannot be
    /// loaded panics with the underlying error instead of ending the epoch.
    fn get(&self, index: usize) -> Option<FashionNetItem> {
        let path = self.filepath(index)?.to_string_lossy().to_string();

        match self.item(index) {
            Ok((tensor, label)) => Some(FashionNetItem::new(tensor, label, path)),
            Err(e) => {
                error!("Failed to load item {} ({}): {}", index, path, e);
                panic!("fashionNet item {} could not be loaded: {}", index, e);
            }
        }
    }

    fn len(&self) -> usize {
        FashionNetDataset::len(self)
    }
}

/// Batch of fashionNet items for training
#[derive(Clone, Debug)]
pub struct FashionNetBatch<B: Backend> {
    /// Images tensor [batch_size, 3, height, width]
    pub images: Tensor<B, 4>,
    /// Class id tensor [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Batcher for creating fashionNet batches
#[derive(Clone, Debug)]
pub struct FashionNetBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> FashionNetBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<FashionNetItem, FashionNetBatch<B>> for FashionNetBatcher<B> {
    fn batch(&self, items: Vec<FashionNetItem>) -> FashionNetBatch<B> {
        let batch_size = items.len();
        let (height, width) = items
            .first()
            .map(|item| (item.height, item.width))
            .unwrap_or((0, 0));

        for (i, item) in items.iter().enumerate() {
            if (item.height, item.width) != (height, width)
                || item.image.len() != CHANNELS * height * width
            {
                panic!(
                    "Cannot batch item {} ({}): shape [{}, {}, {}] with {} values, expected [{}, {}, {}]",
                    i,
                    item.path,
                    CHANNELS,
                    item.height,
                    item.width,
                    item.image.len(),
                    CHANNELS,
                    height,
                    width
                );
            }
        }

        // Items are already normalized by the preprocessing pipeline
        let images_data: Vec<f32> = items.iter().flat_map(|item| item.image.iter().copied()).collect();
        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(images_data, [batch_size, CHANNELS, height, width]),
            &self.device,
        );

        let targets_data: Vec<i64> = items.iter().map(|item| item.label as i64).collect();
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(targets_data, [batch_size]),
            &self.device,
        );

        FashionNetBatch { images, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::index::{Record, Subset};
    use burn_ndarray::NdArray;
    use std::path::PathBuf;

    type TestBackend = NdArray;

    fn item(label: usize, fill: f32) -> FashionNetItem {
        FashionNetItem {
            image: vec![fill; 3 * 28 * 28],
            height: 28,
            width: 28,
            label,
            path: format!("/data/{}.jpg", label),
        }
    }

    #[test]
    fn test_batcher_shapes() {
        let batcher = FashionNetBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(vec![item(0, 0.1), item(3, -0.2), item(1, 0.5)]);

        assert_eq!(batch.images.dims(), [3, 3, 28, 28]);
        assert_eq!(batch.targets.dims(), [3]);

        let targets: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(targets, vec![0, 3, 1]);
    }

    #[test]
    fn test_batcher_keeps_values() {
        let batcher = FashionNetBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(vec![item(2, -0.842)]);

        let values: Vec<f32> = batch.images.into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| (v + 0.842).abs() < 1e-6));
    }

    fn missing_file_dataset() -> FashionNetDataset {
        FashionNetDataset::from_records(
            Subset::Background,
            vec![Record {
                subset: Subset::Background,
                class_name: "a".to_string(),
                filepath: PathBuf::from("/nonexistent/a/0.jpg"),
            }],
        )
    }

    #[test]
    #[should_panic(expected = "Cannot batch item 1")]
    fn test_batcher_rejects_mixed_shapes() {
        let mut wide = item(1, 0.0);
        wide.width = 42;
        wide.image = vec![0.0; 3 * 28 * 42];

        let batcher = FashionNetBatcher::<TestBackend>::new(Default::default());
        batcher.batch(vec![item(0, 0.0), wide]);
    }

    #[test]
    #[should_panic(expected = "Cannot batch item 0")]
    fn test_batcher_rejects_short_buffer() {
        let mut short = item(0, 0.0);
        short.image.truncate(10);

        let batcher = FashionNetBatcher::<TestBackend>::new(Default::default());
        batcher.batch(vec![short]);
    }

    #[test]
    fn test_dataset_get_out_of_range() {
        let dataset = missing_file_dataset();

        assert_eq!(Dataset::<FashionNetItem>::len(&dataset), 1);
        assert!(Dataset::<FashionNetItem>::get(&dataset, 1).is_none());
    }

    #[test]
    #[should_panic(expected = "could not be loaded")]
    fn test_dataset_get_missing_file_panics() {
        let dataset = missing_file_dataset();
        Dataset::<FashionNetItem>::get(&dataset, 0);
    }
}
