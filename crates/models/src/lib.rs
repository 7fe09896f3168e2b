//! Burn ML models for specimen-image regression.
//!
//! This crate defines the network architecture used to predict a continuous
//! measurement from an image:
//! - `RegressionNet`: residual convolutional network with a single scalar head.
//!
//! It is a pure Burn Module with no awareness of datasets or the training
//! loop; the `training` crate owns optimization, evaluation and persistence.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d};
use burn::tensor::activation::relu;
use burn::tensor::{backend::Backend, Tensor};

#[derive(Debug, Clone, Copy)]
pub struct RegressionNetConfig {
    /// Channel count after the stem; doubles at every stage.
    pub width: usize,
    /// Number of stages; each stage after the first downsamples by 2.
    pub stages: usize,
    pub blocks_per_stage: usize,
}

impl Default for RegressionNetConfig {
    fn default() -> Self {
        Self {
            width: 32,
            stages: 3,
            blocks_per_stage: 2,
        }
    }
}

#[derive(Module, Debug)]
struct ResidualBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    /// 1x1 projection when the block changes shape; identity otherwise.
    shortcut: Option<Conv2d<B>>,
}

impl<B: Backend> ResidualBlock<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let bn1 = BatchNormConfig::new(out_channels).init(device);
        let conv2 = Conv2dConfig::new([out_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let bn2 = BatchNormConfig::new(out_channels).init(device);
        let shortcut = (in_channels != out_channels || stride != 1).then(|| {
            Conv2dConfig::new([in_channels, out_channels], [1, 1])
                .with_stride([stride, stride])
                .init(device)
        });
        Self {
            conv1,
            bn1,
            conv2,
            bn2,
            shortcut,
        }
    }

    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let residual = match &self.shortcut {
            Some(projection) => projection.forward(input.clone()),
            None => input.clone(),
        };
        let x = relu(self.bn1.forward(self.conv1.forward(input)));
        let x = self.bn2.forward(self.conv2.forward(x));
        relu(x + residual)
    }
}

#[derive(Module, Debug)]
pub struct RegressionNet<B: Backend> {
    stem: Conv2d<B>,
    stem_bn: BatchNorm<B, 2>,
    blocks: Vec<ResidualBlock<B>>,
    pool: AdaptiveAvgPool2d,
    head: Linear<B>,
}

impl<B: Backend> RegressionNet<B> {
    pub fn new(cfg: RegressionNetConfig, device: &B::Device) -> Self {
        let stages = cfg.stages.max(1);
        let blocks_per_stage = cfg.blocks_per_stage.max(1);
        let width = cfg.width.max(1);

        let stem = Conv2dConfig::new([3, width], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let stem_bn = BatchNormConfig::new(width).init(device);

        let mut blocks = Vec::new();
        let mut channels = width;
        for stage in 0..stages {
            let out_channels = width << stage;
            for block in 0..blocks_per_stage {
                // First block of a later stage doubles channels and halves resolution.
                let stride = if stage > 0 && block == 0 { 2 } else { 1 };
                blocks.push(ResidualBlock::new(channels, out_channels, stride, device));
                channels = out_channels;
            }
        }

        let pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let head = LinearConfig::new(channels, 1).init(device);

        Self {
            stem,
            stem_bn,
            blocks,
            pool,
            head,
        }
    }

    /// Predict one scalar per image: `[batch, 3, H, W]` -> `[batch, 1]`.
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = relu(self.stem_bn.forward(self.stem.forward(images)));
        for block in &self.blocks {
            x = block.forward(x);
        }
        let x = self.pool.forward(x);
        let batch = x.dims()[0];
        let channels = x.dims()[1];
        self.head.forward(x.reshape([batch, channels]))
    }
}

pub mod prelude {
    pub use super::{RegressionNet, RegressionNetConfig};
}
