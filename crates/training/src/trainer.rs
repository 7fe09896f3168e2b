//! The training entry point: epoch loop, scheduled evaluation, reporting and
//! checkpointing.

use crate::checkpoint::{checkpoint_path, save_checkpoint};
use crate::metrics;
use crate::predict::predict_in_batches;
use crate::report::{PredictionReport, ReportSheet};
use crate::schedule::should_evaluate;
use crate::TrainBackend;
use anyhow::Context;
use burn::backend::Autodiff;
use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::Backend;
use clap::{Parser, ValueEnum};
use dataset::{DatasetConfig, RawSplit, SplitSamples};
use models::{RegressionNet, RegressionNetConfig};
use std::fs;
use std::path::Path;

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BackendKind {
    NdArray,
    Wgpu,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "train",
    about = "Train RegressionNet to predict a measurement column from images"
)]
pub struct TrainArgs {
    /// Dataset root containing labels.csv and the images it references.
    #[arg(long, default_value = "assets/dataset")]
    pub dataset_root: String,
    /// Measurement column to regress (0-based).
    #[arg(long, default_value_t = 0)]
    pub target_column: usize,
    /// Backend to use (ndarray or wgpu if enabled).
    #[arg(long, value_enum, default_value_t = BackendKind::NdArray)]
    pub backend: BackendKind,
    /// Number of epochs.
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,
    /// Learning rate.
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f32,
    /// Mini-batch size for training passes.
    #[arg(long, default_value_t = 32)]
    pub train_batch_size: usize,
    /// Batch size for whole-split evaluation passes.
    #[arg(long, default_value_t = 64)]
    pub test_batch_size: usize,
    /// Fraction of samples held out for testing.
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f32,
    /// Seed for backend init and dataset shuffles.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Checkpoint output directory.
    #[arg(long, default_value = "checkpoints")]
    pub model_dir: String,
    /// Prediction report output directory.
    #[arg(long, default_value = ".")]
    pub report_dir: String,
}

type ADBackend = Autodiff<TrainBackend>;

/// Whole-split predictions and metrics from one evaluation pass, in
/// normalized target space.
#[derive(Debug, Clone)]
pub struct EvalSnapshot {
    pub epoch: usize,
    pub train_preds: Vec<f32>,
    pub test_preds: Vec<f32>,
    pub train_rmse: f32,
    pub test_rmse: f32,
    pub train_r2: f32,
    pub test_r2: f32,
}

pub fn run_train(args: TrainArgs) -> anyhow::Result<()> {
    validate_backend_choice(args.backend)?;

    let device = <ADBackend as Backend>::Device::default();
    println!("Using device: {:?}", device);
    ADBackend::seed(args.seed);

    let cfg = DatasetConfig {
        root: args.dataset_root.clone().into(),
        target_column: args.target_column,
        test_fraction: args.test_fraction,
        seed: args.seed,
    };
    let split = SplitSamples::load(&cfg)
        .with_context(|| format!("failed to load dataset at {}", args.dataset_root))?;
    if split.train.is_empty() {
        anyhow::bail!("dataset at {} has no training samples", args.dataset_root);
    }
    let raw = split.tensors::<TrainBackend>(&device);

    let mut model = RegressionNet::<ADBackend>::new(RegressionNetConfig::default(), &device);
    let mut optim = AdamConfig::new().init();
    let mse = MseLoss::new();

    let mut last_eval: Option<EvalSnapshot> = None;
    for epoch in 0..args.epochs {
        let mut batches = split.train_iter(Some(args.seed.wrapping_add(epoch as u64)));
        while let Some((images, targets)) =
            batches.next_batch::<ADBackend>(args.train_batch_size, &device)
        {
            let loss = mse.forward(model.forward(images), targets, Reduction::Mean);
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(args.lr as f64, model, grads);
        }

        if should_evaluate(epoch, args.epochs) {
            let snapshot = evaluate(
                &model.valid(),
                &raw,
                epoch,
                args.train_batch_size,
                args.test_batch_size,
            );
            println!(
                "[{}] Train RMSE: {:.2}, Test RMSE: {:.2}, Train R²: {:.2}, Test R²: {:.2}",
                epoch, snapshot.train_rmse, snapshot.test_rmse, snapshot.train_r2, snapshot.test_r2
            );
            last_eval = Some(snapshot);
        }
    }

    // With zero epochs no evaluation ever ran and there is nothing coherent
    // to report; fail loudly instead of reading unset predictions.
    let snapshot = last_eval.ok_or_else(|| {
        anyhow::anyhow!(
            "training finished without an evaluation pass; \
             configure at least one epoch so the final epoch evaluates"
        )
    })?;

    let stats = split.stats;
    let report = PredictionReport {
        train: ReportSheet::new(
            stats.denormalize_all(&raw.train_targets),
            stats.denormalize_all(&snapshot.train_preds),
        ),
        test: ReportSheet::new(
            stats.denormalize_all(&raw.test_targets),
            stats.denormalize_all(&snapshot.test_preds),
        ),
    };
    report.write(Path::new(&args.report_dir), args.target_column)?;

    fs::create_dir_all(&args.model_dir)
        .with_context(|| format!("failed to create model directory {}", args.model_dir))?;
    let ckpt_path = checkpoint_path(Path::new(&args.model_dir), args.target_column);
    save_checkpoint(model.valid(), stats, &ckpt_path, &device)
        .map_err(|e| anyhow::anyhow!("failed to save checkpoint: {e}"))?;
    println!(
        "Model and normalization params saved to: {}",
        ckpt_path.display()
    );

    Ok(())
}

fn evaluate(
    model: &RegressionNet<TrainBackend>,
    raw: &RawSplit<TrainBackend>,
    epoch: usize,
    train_batch_size: usize,
    test_batch_size: usize,
) -> EvalSnapshot {
    let train_preds = predict_in_batches(model, &raw.train_images, train_batch_size);
    let test_preds = predict_in_batches(model, &raw.test_images, test_batch_size);
    EvalSnapshot {
        epoch,
        train_rmse: metrics::rmse(&train_preds, &raw.train_targets),
        test_rmse: metrics::rmse(&test_preds, &raw.test_targets),
        train_r2: metrics::r_squared(&train_preds, &raw.train_targets),
        test_r2: metrics::r_squared(&test_preds, &raw.test_targets),
        train_preds,
        test_preds,
    }
}

pub fn validate_backend_choice(kind: BackendKind) -> anyhow::Result<()> {
    let built_wgpu = cfg!(feature = "backend-wgpu");
    match (kind, built_wgpu) {
        (BackendKind::Wgpu, false) => {
            anyhow::bail!(
                "backend-wgpu feature not enabled; rebuild with --features backend-wgpu or keep the ndarray backend"
            )
        }
        (BackendKind::NdArray, true) => {
            println!("note: built with backend-wgpu; the WGPU backend is used despite --backend ndarray");
        }
        _ => {}
    }
    Ok(())
}
