use super::result::WaveDetection;
use crate::config::{DetectionConfig, WaveWindow};
use crate::constants::{DEFAULT_HALF_WINDOW, DEFAULT_TROUGH_SEARCH_MS};
use crate::trace::Trace;

/// Peak/trough search within a single wave window
///
/// A peak is the first sample, scanning forward through the window, that is
/// strictly greater than its `half_window` neighbours on each side and
/// strictly greater than the threshold. Its trough is the earliest minimum in
/// the `trough_search_ms` following the peak (peak sample included).
///
/// Candidates are restricted so that all neighbours lie inside the window;
/// the trough search is not, and may run past the window end.
#[derive(Debug, Clone, Copy)]
pub struct WindowScanner {
    half_window: usize,
    trough_search_ms: f64,
}

impl WindowScanner {
    /// # Arguments
    /// * `half_window` - Neighbours a peak must dominate on each side (0 is
    ///   raised to 1)
    /// * `trough_search_ms` - Duration after the peak searched for the trough
    pub fn new(half_window: usize, trough_search_ms: f64) -> Self {
        Self {
            half_window: half_window.max(1),
            trough_search_ms,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.half_window, config.trough_search_ms)
    }

    /// Find at most one peak/trough pair whose peak lies in `window`
    ///
    /// Returns `None` when no candidate qualifies, which asks the caller to
    /// retry at a lower threshold.
    pub fn scan(&self, trace: &Trace, window: &WaveWindow, threshold: f64) -> Option<WaveDetection> {
        let signal = trace.signal();
        let time_ms = trace.time_ms();
        let range = trace.index_range(window.start_ms, window.end_ms);
        if range.is_empty() {
            return None;
        }

        let hw = self.half_window;
        if range.len() <= 2 * hw {
            log::trace!(
                "window [{}, {}] has {} samples, too few for half window {}",
                window.start_ms,
                window.end_ms,
                range.len(),
                hw
            );
            return None;
        }

        let trough_span = trace.samples_in(self.trough_search_ms);

        for idx in (range.start + hw)..(range.end - hw) {
            let value = signal[idx];
            if value <= threshold || !is_strict_local_max(signal, idx, hw) {
                continue;
            }

            let search_end = idx.saturating_add(trough_span).min(signal.len());
            let Some(trough_idx) = earliest_min_index(signal, idx, search_end) else {
                log::trace!("peak at {} has no room for a trough, continuing", idx);
                continue;
            };

            return Some(WaveDetection {
                latency_ms: time_ms[idx],
                amplitude: value - signal[trough_idx],
                peak_index: idx,
                trough_index: trough_idx,
            });
        }

        None
    }
}

impl Default for WindowScanner {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_WINDOW, DEFAULT_TROUGH_SEARCH_MS)
    }
}

/// True if `signal[idx]` exceeds every sample within `hw` positions of it
///
/// Caller guarantees `hw <= idx` and `idx + hw < signal.len()`.
fn is_strict_local_max(signal: &[f64], idx: usize, hw: usize) -> bool {
    let value = signal[idx];
    (1..=hw).all(|j| value > signal[idx - j] && value > signal[idx + j])
}

/// Absolute index of the first minimum in `signal[start..end]`
///
/// `None` when the range holds fewer than two samples.
fn earliest_min_index(signal: &[f64], start: usize, end: usize) -> Option<usize> {
    if end < start + 2 {
        return None;
    }
    let mut min_idx = start;
    for (i, &v) in signal[start..end].iter().enumerate().skip(1) {
        if v < signal[min_idx] {
            min_idx = start + i;
        }
    }
    Some(min_idx)
}

/// Scan one window with the default trough search duration
///
/// Convenience wrapper over [`WindowScanner::scan`] for callers with raw
/// window bounds. A `half_window` of 0 is scanned as 1; configured analyses
/// reject 0 in [`AnalysisConfig::validate`](crate::config::AnalysisConfig::validate).
pub fn detect_wave(
    trace: &Trace,
    start_ms: f64,
    end_ms: f64,
    threshold: f64,
    half_window: usize,
) -> Option<WaveDetection> {
    WindowScanner::new(half_window, DEFAULT_TROUGH_SEARCH_MS).scan(
        trace,
        &WaveWindow::new(start_ms, end_ms),
        threshold,
    )
}
