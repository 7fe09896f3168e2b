//! Target normalization statistics.

/// Spreads below this are treated as degenerate and replaced by a unit scale,
/// keeping normalization invertible for constant target columns.
pub const MIN_STD: f32 = 1e-6;

/// Mean and standard deviation of the training split's target values.
///
/// The same pair normalizes targets for training and denormalizes predictions
/// for reporting, and is persisted inside the checkpoint so inference-time
/// denormalization matches training-time normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStats {
    pub mean: f32,
    pub std: f32,
}

impl TargetStats {
    /// Population mean/std over `values`. Empty input yields the identity
    /// transform (mean 0, std 1).
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                std: 1.0,
            };
        }
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
        let std = variance.sqrt();
        let std = if std < MIN_STD { 1.0 } else { std };
        Self { mean, std }
    }

    pub fn normalize(&self, value: f32) -> f32 {
        (value - self.mean) / self.std
    }

    /// Inverse of [`normalize`](Self::normalize): `value * std + mean`.
    pub fn denormalize(&self, value: f32) -> f32 {
        value * self.std + self.mean
    }

    pub fn denormalize_all(&self, values: &[f32]) -> Vec<f32> {
        values.iter().map(|v| self.denormalize(*v)).collect()
    }
}
