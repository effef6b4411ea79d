mod analyzer;
mod result;
mod scanner;

pub use analyzer::{WaveAnalyzer, analyze};
pub use result::{TraceResult, WaveDetection, WaveResult};
pub use scanner::{WindowScanner, detect_wave};
