use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbrError {
    #[error("Length mismatch: signal has {signal} samples, time axis has {time}")]
    LengthMismatch { signal: usize, time: usize },

    #[error("Insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("Time axis not strictly increasing at index {index}")]
    NonIncreasingTime { index: usize },

    #[error(
        "Non-uniform sampling at index {index}: interval {interval:.6}ms, expected {expected:.6}ms"
    )]
    NonUniformSampling {
        index: usize,
        interval: f64,
        expected: f64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, AbrError>;
