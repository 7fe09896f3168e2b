//! Memory-bounded batched inference.

use burn::tensor::{backend::Backend, Tensor};
use models::RegressionNet;

/// Run `model` over all `images` in chunks of at most `batch_size`, returning
/// one prediction per image on the host.
///
/// Equivalent to a single whole-tensor forward pass, but peak memory is
/// bounded by the chunk size. Zero images yield an empty vector. A zero
/// `batch_size` is clamped to 1.
///
/// Callers evaluating mid-training should pass the inference-backend view of
/// their model (`AutodiffModule::valid()`): that is what disables gradient
/// tracking and switches normalization layers to their frozen statistics.
/// The training-side model is left untouched.
pub fn predict_in_batches<B: Backend>(
    model: &RegressionNet<B>,
    images: &Tensor<B, 4>,
    batch_size: usize,
) -> Vec<f32> {
    let total = images.dims()[0];
    let batch_size = batch_size.max(1);

    let mut preds = Vec::with_capacity(total);
    let mut start = 0;
    while start < total {
        let end = (start + batch_size).min(total);
        let chunk = images.clone().slice([start..end]);
        let out = model.forward(chunk);
        preds.extend(out.into_data().to_vec::<f32>().unwrap_or_default());
        start = end;
    }
    preds
}
