//! Dataset loading, splitting, and Burn-compatible batching for
//! specimen-image regression.
//!
//! This crate provides:
//! - Label-table loading (`labels.csv`: image file name + measurement columns)
//! - Deterministic train/test splitting
//! - Target normalization statistics
//! - Image decoding into CHW f32 buffers
//! - Mini-batch iteration over either split

pub mod batch;
pub mod labels;
pub mod split;
pub mod stats;
pub mod types;

pub use batch::BatchIter;
pub use labels::{LabelTable, LABELS_FILE};
pub use split::{split_indices, SplitIndices};
pub use stats::TargetStats;
pub use types::{DatasetError, DatasetResult, Sample};

use burn::tensor::{backend::Backend, Tensor};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Directory holding `labels.csv` and the images it references.
    pub root: PathBuf,
    /// 0-based index into the measurement columns of the label table.
    pub target_column: usize,
    /// Fraction of samples held out for testing.
    pub test_fraction: f32,
    /// Seed for the split shuffle.
    pub seed: u64,
}

/// Both splits fully decoded, with targets already normalized by `stats`.
#[derive(Debug, Clone)]
pub struct SplitSamples {
    pub width: u32,
    pub height: u32,
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
    /// Statistics of the raw training targets; normalizes and denormalizes
    /// every target and prediction in this run.
    pub stats: TargetStats,
}

/// Whole-split tensors for batched evaluation, alongside the normalized
/// target values in split order.
#[derive(Debug, Clone)]
pub struct RawSplit<B: Backend> {
    pub train_images: Tensor<B, 4>,
    pub train_targets: Vec<f32>,
    pub test_images: Tensor<B, 4>,
    pub test_targets: Vec<f32>,
}

impl SplitSamples {
    pub fn load(cfg: &DatasetConfig) -> DatasetResult<Self> {
        let table = LabelTable::load(&cfg.root)?;
        let targets = table.targets(cfg.target_column)?;
        let splits = split_indices(table.len(), cfg.test_fraction, cfg.seed);

        let train_raw: Vec<f32> = splits.train.iter().map(|&i| targets[i]).collect();
        let stats = TargetStats::from_values(&train_raw);

        let mut expected: Option<(u32, u32)> = None;
        let train = load_samples(&table, &splits.train, &targets, stats, &mut expected)?;
        let test = load_samples(&table, &splits.test, &targets, stats, &mut expected)?;
        let (width, height) = expected.unwrap_or((0, 0));

        Ok(Self {
            width,
            height,
            train,
            test,
            stats,
        })
    }

    /// Training-order iterator; pass a seed to shuffle the epoch.
    pub fn train_iter(&self, shuffle_seed: Option<u64>) -> BatchIter<'_> {
        BatchIter::new(&self.train, self.width, self.height, shuffle_seed)
    }

    /// Test iterator, never shuffled.
    pub fn test_iter(&self) -> BatchIter<'_> {
        BatchIter::new(&self.test, self.width, self.height, None)
    }

    /// Materialize both splits as single tensors for whole-split evaluation.
    pub fn tensors<B: Backend>(&self, device: &B::Device) -> RawSplit<B> {
        let (train_images, train_targets) =
            split_tensor::<B>(&self.train, self.width, self.height, device);
        let (test_images, test_targets) =
            split_tensor::<B>(&self.test, self.width, self.height, device);
        RawSplit {
            train_images,
            train_targets,
            test_images,
            test_targets,
        }
    }
}

fn split_tensor<B: Backend>(
    samples: &[Sample],
    width: u32,
    height: u32,
    device: &B::Device,
) -> (Tensor<B, 4>, Vec<f32>) {
    let plane = 3 * width as usize * height as usize;
    let mut buffer = Vec::with_capacity(samples.len() * plane);
    let mut targets = Vec::with_capacity(samples.len());
    for sample in samples {
        buffer.extend_from_slice(&sample.image_chw);
        targets.push(sample.target);
    }
    let images = Tensor::<B, 1>::from_floats(buffer.as_slice(), device).reshape([
        samples.len(),
        3,
        height as usize,
        width as usize,
    ]);
    (images, targets)
}

fn load_samples(
    table: &LabelTable,
    indices: &[usize],
    targets: &[f32],
    stats: TargetStats,
    expected: &mut Option<(u32, u32)>,
) -> DatasetResult<Vec<Sample>> {
    let decoded: Vec<DatasetResult<(Vec<f32>, u32, u32)>> = indices
        .par_iter()
        .map(|&i| load_image_chw(&table.image_path(i)))
        .collect();

    let mut samples = Vec::with_capacity(indices.len());
    for (&i, result) in indices.iter().zip(decoded) {
        let (image_chw, width, height) = result?;
        match *expected {
            None => *expected = Some((width, height)),
            Some((expected_width, expected_height))
                if expected_width != width || expected_height != height =>
            {
                return Err(DatasetError::Shape {
                    path: table.image_path(i),
                    width,
                    height,
                    expected_width,
                    expected_height,
                });
            }
            Some(_) => {}
        }
        samples.push(Sample {
            image_chw,
            target: stats.normalize(targets[i]),
        });
    }
    Ok(samples)
}

fn load_image_chw(path: &Path) -> DatasetResult<(Vec<f32>, u32, u32)> {
    let img = image::open(path)
        .map_err(|source| DatasetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (width, height) = img.dimensions();
    let mut chw = Vec::with_capacity(3 * (width * height) as usize);
    for c in 0..3 {
        for y in 0..height {
            for x in 0..width {
                chw.push(img.get_pixel(x, y)[c] as f32 / 255.0);
            }
        }
    }
    Ok((chw, width, height))
}
