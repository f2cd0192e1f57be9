//! Metrics Module for Model Evaluation
//!
//! Batch-level classification metrics over Burn tensors, plus a by-name
//! registry so training configs can refer to metrics as strings.

use burn::prelude::*;

use super::error::{FashionNetError, Result};

/// Signature shared by every named metric: `(ground_truth, predictions) -> value`
pub type MetricFn<B> = fn(Tensor<B, 1, Int>, Tensor<B, 2>) -> Result<f64>;

/// Names accepted by [`named_metric`]
pub const METRIC_NAMES: [&str; 1] = ["categorical_accuracy"];

/// Top-1 categorical accuracy for one batch.
///
/// # Arguments
/// * `y` - Ground truth categories, shape `[batch_size]`
/// * `y_pred` - Prediction probabilities or logits, shape `[batch_size, num_categories]`
///
/// Returns the fraction of rows whose argmax equals the ground truth.
/// An empty batch is a caller error and yields [`FashionNetError::EmptyBatch`].
pub fn categorical_accuracy<B: Backend>(y: Tensor<B, 1, Int>, y_pred: Tensor<B, 2>) -> Result<f64> {
    let [batch_size, num_categories] = y_pred.dims();
    let [num_labels] = y.dims();

    if num_labels != batch_size {
        return Err(FashionNetError::InvalidArgument(format!(
            "ground truth has {} labels but predictions have {} rows",
            num_labels, batch_size
        )));
    }
    if batch_size == 0 {
        return Err(FashionNetError::EmptyBatch);
    }
    if num_categories == 0 {
        return Err(FashionNetError::InvalidArgument(
            "predictions have zero categories".to_string(),
        ));
    }

    let correct: i64 = y_pred
        .argmax(1)
        .squeeze::<1>(1)
        .equal(y)
        .int()
        .sum()
        .into_scalar()
        .elem();

    Ok(correct as f64 / batch_size as f64)
}

/// Look up a metric by name
pub fn named_metric<B: Backend>(name: &str) -> Option<MetricFn<B>> {
    match name {
        "categorical_accuracy" => Some(categorical_accuracy::<B>),
        _ => None,
    }
}
