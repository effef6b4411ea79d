//! Validated signal / time-axis pairs.

use crate::constants::{DEFAULT_SAMPLING_TOLERANCE, SAMPLE_COUNT_EPSILON};
use crate::error::{AbrError, Result};

/// An averaged ABR waveform with its time axis in milliseconds
///
/// Construction checks every precondition the detector relies on: equal
/// lengths, at least two samples, finite values, a strictly increasing time
/// axis and uniform sampling. Detection on a `Trace` never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    signal: Vec<f64>,
    time_ms: Vec<f64>,
    sample_interval_ms: f64,
}

impl Trace {
    /// Pair a signal with its time axis using the default sampling tolerance
    pub fn new(signal: Vec<f64>, time_ms: Vec<f64>) -> Result<Self> {
        Self::with_tolerance(signal, time_ms, DEFAULT_SAMPLING_TOLERANCE)
    }

    /// Pair a signal with its time axis
    ///
    /// `tolerance` is the largest relative deviation of any sampling interval
    /// from the median interval before the axis is rejected as non-uniform.
    pub fn with_tolerance(signal: Vec<f64>, time_ms: Vec<f64>, tolerance: f64) -> Result<Self> {
        Self::with_resolution(signal, time_ms, tolerance, 0.0)
    }

    /// Pair a signal with a time axis whose stamps were rounded to `resolution_ms`
    ///
    /// Rounding both ends of an interval can move it by up to one resolution
    /// step, so that much is allowed on top of the relative tolerance.
    pub fn with_resolution(
        signal: Vec<f64>,
        time_ms: Vec<f64>,
        tolerance: f64,
        resolution_ms: f64,
    ) -> Result<Self> {
        if signal.len() != time_ms.len() {
            return Err(AbrError::LengthMismatch {
                signal: signal.len(),
                time: time_ms.len(),
            });
        }
        if signal.len() < 2 {
            return Err(AbrError::InsufficientData {
                needed: 2,
                available: signal.len(),
            });
        }

        if let Some(index) = signal
            .iter()
            .zip(&time_ms)
            .position(|(s, t)| !s.is_finite() || !t.is_finite())
        {
            return Err(AbrError::NonFinite { index });
        }

        let mut intervals = Vec::with_capacity(time_ms.len() - 1);
        for (i, pair) in time_ms.windows(2).enumerate() {
            let interval = pair[1] - pair[0];
            if interval <= 0.0 {
                return Err(AbrError::NonIncreasingTime { index: i + 1 });
            }
            intervals.push(interval);
        }

        let expected = median(&intervals);
        let slack = tolerance * expected + resolution_ms.max(0.0);
        if let Some(i) = intervals
            .iter()
            .position(|&interval| (interval - expected).abs() > slack)
        {
            return Err(AbrError::NonUniformSampling {
                index: i + 1,
                interval: intervals[i],
                expected,
            });
        }

        let sample_interval_ms = time_ms[1] - time_ms[0];
        Ok(Self {
            signal,
            time_ms,
            sample_interval_ms,
        })
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn time_ms(&self) -> &[f64] {
        &self.time_ms
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    /// Interval between consecutive samples, taken from the first two timestamps
    pub fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_ms
    }

    /// Whole number of samples spanned by `duration_ms` (truncating)
    pub fn samples_in(&self, duration_ms: f64) -> usize {
        let count = duration_ms / self.sample_interval_ms + SAMPLE_COUNT_EPSILON;
        if count <= 0.0 { 0 } else { count.floor() as usize }
    }

    /// Index range `[first, last)` of samples whose time lies in `[start_ms, end_ms]`
    pub fn index_range(&self, start_ms: f64, end_ms: f64) -> std::ops::Range<usize> {
        let first = self.time_ms.partition_point(|&t| t < start_ms);
        let last = self.time_ms.partition_point(|&t| t <= end_ms);
        first..last.max(first)
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[sorted.len() / 2]
}
