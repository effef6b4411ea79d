pub mod abr;
pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod output;
pub mod trace;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use abr::{TraceResult, WaveAnalyzer, WaveDetection, WindowScanner, analyze, detect_wave};
pub use config::{AnalysisConfig, WaveId, WaveWindow};
pub use error::{AbrError, Result};
pub use trace::Trace;
