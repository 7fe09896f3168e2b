//! Two-sheet prediction report: true vs. predicted per sample, in original
//! (denormalized) units.

use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct ReportRow {
    #[serde(rename = "true")]
    truth: f32,
    predicted: f32,
}

/// One sheet of paired values, row `i` describing sample `i` of a split.
#[derive(Debug, Clone)]
pub struct ReportSheet {
    truth: Vec<f32>,
    predicted: Vec<f32>,
}

impl ReportSheet {
    pub fn new(truth: Vec<f32>, predicted: Vec<f32>) -> Self {
        assert_eq!(truth.len(), predicted.len());
        Self { truth, predicted }
    }

    pub fn len(&self) -> usize {
        self.truth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.truth.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub train: ReportSheet,
    pub test: ReportSheet,
}

impl PredictionReport {
    /// Write both sheets as
    /// `predictions_vs_actual_col{target}_{train,test}.csv` under `dir`,
    /// creating the directory if needed and overwriting previous sheets.
    /// Returns the written paths.
    pub fn write(&self, dir: &Path, target_column: usize) -> anyhow::Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create report directory {}", dir.display()))?;
        let train_path = dir.join(format!("predictions_vs_actual_col{target_column}_train.csv"));
        let test_path = dir.join(format!("predictions_vs_actual_col{target_column}_test.csv"));
        write_sheet(&train_path, &self.train)?;
        write_sheet(&test_path, &self.test)?;
        Ok((train_path, test_path))
    }
}

fn write_sheet(path: &Path, sheet: &ReportSheet) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create report sheet {}", path.display()))?;
    for (truth, predicted) in sheet.truth.iter().zip(&sheet.predicted) {
        writer.serialize(ReportRow {
            truth: *truth,
            predicted: *predicted,
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush report sheet {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_land_with_header_and_one_row_per_sample() {
        let temp = tempfile::tempdir().unwrap();
        let report = PredictionReport {
            train: ReportSheet::new(vec![1.0, 2.0, 3.0], vec![1.1, 1.9, 3.2]),
            test: ReportSheet::new(vec![4.0], vec![3.8]),
        };
        let (train_path, test_path) = report.write(temp.path(), 2).unwrap();
        assert!(train_path.ends_with("predictions_vs_actual_col2_train.csv"));
        assert!(test_path.ends_with("predictions_vs_actual_col2_test.csv"));

        let train = fs::read_to_string(&train_path).unwrap();
        let mut lines = train.lines();
        assert_eq!(lines.next(), Some("true,predicted"));
        assert_eq!(lines.count(), 3);

        let test = fs::read_to_string(&test_path).unwrap();
        assert_eq!(test.lines().count(), 2);
    }

    #[test]
    fn rewriting_overwrites_previous_sheets() {
        let temp = tempfile::tempdir().unwrap();
        let first = PredictionReport {
            train: ReportSheet::new(vec![1.0, 2.0], vec![1.0, 2.0]),
            test: ReportSheet::new(vec![], vec![]),
        };
        first.write(temp.path(), 0).unwrap();
        let second = PredictionReport {
            train: ReportSheet::new(vec![9.0], vec![8.5]),
            test: ReportSheet::new(vec![], vec![]),
        };
        let (train_path, _) = second.write(temp.path(), 0).unwrap();
        let contents = fs::read_to_string(&train_path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("9.0"));
    }
}
