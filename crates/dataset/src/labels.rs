//! Tabular label source: one row per image, one column per measurement.

use crate::types::{DatasetError, DatasetResult};
use std::path::{Path, PathBuf};

/// Expected file name of the label table inside the dataset root.
pub const LABELS_FILE: &str = "labels.csv";

#[derive(Debug, Clone)]
pub struct LabelRow {
    /// Image file name, relative to the dataset root.
    pub image: String,
    /// Continuous measurement values, one per column.
    pub measurements: Vec<f32>,
}

/// Parsed `labels.csv`: a header row, then one row per image whose first
/// field is the image file name and whose remaining fields are numeric.
#[derive(Debug, Clone)]
pub struct LabelTable {
    root: PathBuf,
    rows: Vec<LabelRow>,
}

impl LabelTable {
    pub fn load(root: &Path) -> DatasetResult<Self> {
        let path = root.join(LABELS_FILE);
        let mut reader = csv::Reader::from_path(&path).map_err(|source| DatasetError::Csv {
            path: path.clone(),
            source,
        })?;

        let mut rows = Vec::new();
        let mut columns: Option<usize> = None;
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|source| DatasetError::Csv {
                path: path.clone(),
                source,
            })?;
            let mut fields = record.iter();
            let image = fields.next().unwrap_or("").trim().to_string();
            if image.is_empty() {
                return Err(DatasetError::Label {
                    path: path.clone(),
                    row: idx,
                    msg: "missing image file name".to_string(),
                });
            }
            let mut measurements = Vec::new();
            for field in fields {
                let value: f32 = field.trim().parse().map_err(|_| DatasetError::Label {
                    path: path.clone(),
                    row: idx,
                    msg: format!("non-numeric measurement '{}'", field.trim()),
                })?;
                measurements.push(value);
            }
            match columns {
                None => columns = Some(measurements.len()),
                Some(expected) if expected != measurements.len() => {
                    return Err(DatasetError::Label {
                        path: path.clone(),
                        row: idx,
                        msg: format!(
                            "expected {expected} measurement columns, found {}",
                            measurements.len()
                        ),
                    });
                }
                Some(_) => {}
            }
            rows.push(LabelRow {
                image,
                measurements,
            });
        }

        if rows.is_empty() {
            return Err(DatasetError::Empty { path });
        }

        Ok(Self {
            root: root.to_path_buf(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn measurement_columns(&self) -> usize {
        self.rows.first().map_or(0, |r| r.measurements.len())
    }

    /// Raw (unnormalized) values of one measurement column, in row order.
    pub fn targets(&self, column: usize) -> DatasetResult<Vec<f32>> {
        let available = self.measurement_columns();
        if column >= available {
            return Err(DatasetError::Column { column, available });
        }
        Ok(self.rows.iter().map(|r| r.measurements[column]).collect())
    }

    pub fn image_path(&self, index: usize) -> PathBuf {
        self.root.join(&self.rows[index].image)
    }
}
