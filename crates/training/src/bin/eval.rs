use burn::tensor::backend::Backend;
use clap::Parser;
use dataset::{DatasetConfig, SplitSamples};
use models::RegressionNetConfig;
use std::path::Path;
use training::checkpoint::load_checkpoint;
use training::metrics;
use training::predict::predict_in_batches;
use training::report::{PredictionReport, ReportSheet};
use training::TrainBackend;

#[derive(Parser, Debug)]
#[command(
    name = "eval",
    about = "Evaluate a RegressionNet checkpoint against a dataset split (RMSE/R² in original units)"
)]
struct Args {
    /// Dataset root containing labels.csv and the images it references.
    #[arg(long, default_value = "assets/dataset")]
    dataset_root: String,
    /// Measurement column the checkpoint was trained on (0-based).
    #[arg(long, default_value_t = 0)]
    target_column: usize,
    /// Checkpoint path to load.
    #[arg(long)]
    checkpoint: String,
    /// Fraction of samples held out for testing.
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f32,
    /// Split seed; must match training to reproduce the same hold-out.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Batch size for evaluation passes.
    #[arg(long, default_value_t = 64)]
    batch_size: usize,
    /// Optional directory to write prediction sheets into.
    #[arg(long)]
    report_dir: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let device = <TrainBackend as Backend>::Device::default();
    println!("Using device: {:?}", device);

    let cfg = DatasetConfig {
        root: args.dataset_root.clone().into(),
        target_column: args.target_column,
        test_fraction: args.test_fraction,
        seed: args.seed,
    };
    let split = SplitSamples::load(&cfg)?;
    let raw = split.tensors::<TrainBackend>(&device);

    let (model, stats) = load_checkpoint::<TrainBackend>(
        Path::new(&args.checkpoint),
        RegressionNetConfig::default(),
        &device,
    )
    .map_err(|e| anyhow::anyhow!("failed to load checkpoint {}: {e}", args.checkpoint))?;

    // Everything below is in original units: predictions denormalized with
    // the checkpoint's stats, truths with the split's own.
    let train_preds = stats.denormalize_all(&predict_in_batches(
        &model,
        &raw.train_images,
        args.batch_size,
    ));
    let test_preds = stats.denormalize_all(&predict_in_batches(
        &model,
        &raw.test_images,
        args.batch_size,
    ));
    let train_true = split.stats.denormalize_all(&raw.train_targets);
    let test_true = split.stats.denormalize_all(&raw.test_targets);

    println!(
        "Train RMSE: {:.2}, R²: {:.2} ({} samples)",
        metrics::rmse(&train_preds, &train_true),
        metrics::r_squared(&train_preds, &train_true),
        train_true.len()
    );
    println!(
        "Test RMSE: {:.2}, R²: {:.2} ({} samples)",
        metrics::rmse(&test_preds, &test_true),
        metrics::r_squared(&test_preds, &test_true),
        test_true.len()
    );

    if let Some(report_dir) = args.report_dir {
        let report = PredictionReport {
            train: ReportSheet::new(train_true, train_preds),
            test: ReportSheet::new(test_true, test_preds),
        };
        let (train_sheet, test_sheet) =
            report.write(Path::new(&report_dir), args.target_column)?;
        println!(
            "Wrote prediction sheets: {}, {}",
            train_sheet.display(),
            test_sheet.display()
        );
    }

    Ok(())
}
