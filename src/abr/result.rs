use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::WaveId;

/// A detected peak paired with its following trough
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WaveDetection {
    /// Time of the peak in milliseconds
    pub latency_ms: f64,
    /// Peak value minus trough value; negative when the trough lies above the peak
    pub amplitude: f64,
    pub peak_index: usize,
    pub trough_index: usize,
}

/// Per-window outcome; `None` means no wave was detected in that window
pub type WaveResult = Option<WaveDetection>;

/// Detection outcome for all five waves of one trace
#[derive(Debug, Clone, PartialEq)]
pub struct TraceResult {
    waves: [WaveResult; 5],
    interpeak_1_5: Option<f64>,
    attempts: usize,
    threshold: Option<f64>,
}

impl TraceResult {
    /// Result of the pass that terminated threshold relaxation
    pub fn new(waves: [WaveResult; 5], attempts: usize, threshold: Option<f64>) -> Self {
        let interpeak_1_5 = match (waves[WaveId::Wave1.index()], waves[WaveId::Wave5.index()]) {
            (Some(w1), Some(w5)) => Some(w5.latency_ms - w1.latency_ms),
            _ => None,
        };
        Self {
            waves,
            interpeak_1_5,
            attempts,
            threshold,
        }
    }

    /// Result with every wave absent
    pub fn empty(attempts: usize) -> Self {
        Self::new([None; 5], attempts, None)
    }

    pub fn wave(&self, wave: WaveId) -> Option<&WaveDetection> {
        self.waves[wave.index()].as_ref()
    }

    pub fn waves(&self) -> impl Iterator<Item = (WaveId, Option<&WaveDetection>)> {
        WaveId::ALL
            .into_iter()
            .map(move |id| (id, self.waves[id.index()].as_ref()))
    }

    /// Wave V latency minus wave I latency, when both were detected
    pub fn interpeak_1_5(&self) -> Option<f64> {
        self.interpeak_1_5
    }

    /// Number of threshold passes that ran
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Threshold of the successful pass, if any pass succeeded
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn detected_count(&self) -> usize {
        self.waves.iter().filter(|w| w.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.detected_count() == 0
    }
}

impl Serialize for TraceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WaveId::ALL.len() + 3))?;
        for (id, detection) in self.waves() {
            map.serialize_entry(id.name(), &detection)?;
        }
        map.serialize_entry("interpeak_1_5", &self.interpeak_1_5)?;
        map.serialize_entry("attempts", &self.attempts)?;
        map.serialize_entry("threshold", &self.threshold)?;
        map.end()
    }
}
