//! Core types and error definitions for the dataset crate.

use std::path::PathBuf;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv parse error at {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("image decode error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("label row {row} at {path}: {msg}")]
    Label {
        path: PathBuf,
        row: usize,
        msg: String,
    },
    #[error("target column {column} out of range; label table has {available} measurement columns")]
    Column { column: usize, available: usize },
    #[error(
        "image dimensions differ within split: {path} is {width}x{height}, expected {expected_width}x{expected_height}"
    )]
    Shape {
        path: PathBuf,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("label table at {path} contains no samples")]
    Empty { path: PathBuf },
}

/// One decoded sample, ready for batching.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Image in CHW layout, normalized to [0, 1].
    pub image_chw: Vec<f32>,
    /// Target value in normalized (zero-mean, unit-variance) space.
    pub target: f32,
}
