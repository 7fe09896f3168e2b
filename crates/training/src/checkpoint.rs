//! Checkpoint persistence: model parameters plus normalization scalars in a
//! single recorder file.

use burn::module::{Module, Param};
use burn::record::{BinFileRecorder, FullPrecisionSettings, RecorderError};
use burn::tensor::{backend::Backend, Tensor};
use dataset::TargetStats;
use models::{RegressionNet, RegressionNetConfig};
use std::path::{Path, PathBuf};

/// Model plus the `[mean, std]` pair that normalized its training targets.
///
/// The stats ride as a rank-1 parameter tensor so one `save_file` captures
/// everything needed to use the model later; nothing ever produces a gradient
/// for it, so the optimizer leaves it untouched.
#[derive(Module, Debug)]
pub struct CheckpointBundle<B: Backend> {
    pub model: RegressionNet<B>,
    stats: Param<Tensor<B, 1>>,
}

impl<B: Backend> CheckpointBundle<B> {
    pub fn new(model: RegressionNet<B>, stats: TargetStats, device: &B::Device) -> Self {
        let values = Tensor::<B, 1>::from_floats([stats.mean, stats.std], device);
        Self {
            model,
            stats: Param::from_tensor(values),
        }
    }

    pub fn stats(&self) -> TargetStats {
        let values = self.stats.val().into_data().to_vec::<f32>().unwrap_or_default();
        TargetStats {
            mean: values.first().copied().unwrap_or(0.0),
            std: values.get(1).copied().unwrap_or(1.0),
        }
    }
}

/// `{model_dir}/model{target_column}.bin`.
pub fn checkpoint_path(model_dir: &Path, target_column: usize) -> PathBuf {
    model_dir.join(format!("model{target_column}.bin"))
}

pub fn save_checkpoint<B: Backend>(
    model: RegressionNet<B>,
    stats: TargetStats,
    path: &Path,
    device: &B::Device,
) -> Result<(), RecorderError> {
    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    CheckpointBundle::new(model, stats, device).save_file(path, &recorder)
}

/// Rebuild a model with `cfg` and restore parameters and stats from `path`.
/// The config must match the one the checkpoint was trained with.
pub fn load_checkpoint<B: Backend>(
    path: &Path,
    cfg: RegressionNetConfig,
    device: &B::Device,
) -> Result<(RegressionNet<B>, TargetStats), RecorderError> {
    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    let fresh = CheckpointBundle::new(
        RegressionNet::<B>::new(cfg, device),
        TargetStats {
            mean: 0.0,
            std: 1.0,
        },
        device,
    );
    let bundle = fresh.load_file(path, &recorder, device)?;
    let stats = bundle.stats();
    Ok((bundle.model, stats))
}
