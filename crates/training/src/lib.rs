#![recursion_limit = "256"]

pub mod checkpoint;
pub mod metrics;
pub mod predict;
pub mod report;
pub mod schedule;
pub mod trainer;

pub use models::{RegressionNet, RegressionNetConfig};
pub use predict::predict_in_batches;
pub use trainer::{run_train, EvalSnapshot, TrainArgs};
/// Backend alias for training/eval (NdArray by default; WGPU if enabled).
#[cfg(feature = "backend-wgpu")]
pub type TrainBackend = burn_wgpu::Wgpu<f32>;
#[cfg(not(feature = "backend-wgpu"))]
pub type TrainBackend = burn_ndarray::NdArray<f32>;
