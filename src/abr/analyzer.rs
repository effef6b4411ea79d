use super::result::{TraceResult, WaveResult};
use super::scanner::WindowScanner;
use crate::config::{AnalysisConfig, WaveId};
use crate::error::Result;
use crate::trace::Trace;

/// Runs the window scanner over all five waves with threshold relaxation
///
/// Each pass scans every window at the current threshold. The first pass that
/// detects at least one wave ends the search and its results are returned
/// as-is, including windows that found nothing at that threshold. Otherwise
/// the threshold is multiplied by `threshold_decay` and the next pass runs,
/// up to `max_attempts` passes.
#[derive(Debug, Clone)]
pub struct WaveAnalyzer {
    config: AnalysisConfig,
    scanner: WindowScanner,
}

impl WaveAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let scanner = WindowScanner::from_config(&config.detection);
        Ok(Self { config, scanner })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build a `Trace` from raw sequences using this analyzer's sampling
    /// tolerance, then analyze it
    pub fn analyze_raw(&self, signal: Vec<f64>, time_ms: Vec<f64>) -> Result<TraceResult> {
        let trace =
            Trace::with_tolerance(signal, time_ms, self.config.detection.sampling_tolerance)?;
        Ok(self.analyze(&trace))
    }

    pub fn analyze(&self, trace: &Trace) -> TraceResult {
        let detection = &self.config.detection;
        let mut threshold = detection.initial_threshold;

        for attempt in 1..=detection.max_attempts {
            let waves = self.scan_all(trace, threshold);
            let found = waves.iter().filter(|w| w.is_some()).count();

            log::debug!(
                "attempt {}/{}: threshold {:.5}, {} of 5 waves detected",
                attempt,
                detection.max_attempts,
                threshold,
                found
            );

            if found > 0 {
                return TraceResult::new(waves, attempt, Some(threshold));
            }

            threshold *= detection.threshold_decay;
        }

        log::debug!(
            "no wave detected after {} attempts (final threshold {:.5})",
            detection.max_attempts,
            threshold / detection.threshold_decay
        );
        TraceResult::empty(detection.max_attempts)
    }

    fn scan_all(&self, trace: &Trace, threshold: f64) -> [WaveResult; 5] {
        WaveId::ALL.map(|wave| {
            let window = self.config.windows.get(wave);
            let hit = self.scanner.scan(trace, window, threshold);
            if let Some(ref d) = hit {
                log::trace!(
                    "{}: peak {} at {:.3}ms, trough {}, amplitude {:.4}",
                    wave,
                    d.peak_index,
                    d.latency_ms,
                    d.trough_index,
                    d.amplitude
                );
            }
            hit
        })
    }
}

impl Default for WaveAnalyzer {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        let scanner = WindowScanner::from_config(&config.detection);
        Self { config, scanner }
    }
}

/// Analyze a signal with the default configuration
///
/// Fails only when the signal and time axis do not form a valid [`Trace`].
pub fn analyze(signal: &[f64], time_ms: &[f64]) -> Result<TraceResult> {
    WaveAnalyzer::default().analyze_raw(signal.to_vec(), time_ms.to_vec())
}
