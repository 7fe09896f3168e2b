//! Host-side regression metrics.

/// Root-mean-squared error. Empty inputs yield 0.0.
pub fn rmse(predictions: &[f32], targets: &[f32]) -> f32 {
    assert_eq!(predictions.len(), targets.len());
    if predictions.is_empty() {
        return 0.0;
    }
    let mse = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f32>()
        / predictions.len() as f32;
    mse.sqrt()
}

/// Coefficient of determination: R² = 1 - SS_res / SS_tot.
///
/// 1.0 is perfect, 0.0 matches predicting the target mean. A constant target
/// vector yields 0.0 unless the prediction is exact, which yields 1.0.
pub fn r_squared(predictions: &[f32], targets: &[f32]) -> f32 {
    assert_eq!(predictions.len(), targets.len());
    if predictions.is_empty() {
        return 0.0;
    }
    let mean = targets.iter().sum::<f32>() / targets.len() as f32;
    let ss_res: f32 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (t - p) * (t - p))
        .sum();
    let ss_tot: f32 = targets.iter().map(|t| (t - mean) * (t - mean)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
