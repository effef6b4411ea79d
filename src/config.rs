//! Configuration for ABR wave detection.
//!
//! Window boundaries and the threshold relaxation schedule are plain data, so
//! alternate parameter sets can be loaded from TOML:
//!
//! ```toml
//! [windows.wave_5]
//! start_ms = 5.0
//! end_ms = 9.0
//!
//! [detection]
//! initial_threshold = 0.08
//! max_attempts = 20
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HALF_WINDOW, DEFAULT_INITIAL_THRESHOLD, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SAMPLING_TOLERANCE, DEFAULT_THRESHOLD_DECAY, DEFAULT_TROUGH_SEARCH_MS,
};
use crate::error::{AbrError, Result};

/// One of the five ABR response waves (I-V)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WaveId {
    #[serde(rename = "wave_1")]
    Wave1,
    #[serde(rename = "wave_2")]
    Wave2,
    #[serde(rename = "wave_3")]
    Wave3,
    #[serde(rename = "wave_4")]
    Wave4,
    #[serde(rename = "wave_5")]
    Wave5,
}

impl WaveId {
    /// All waves in chronological order
    pub const ALL: [WaveId; 5] = [
        WaveId::Wave1,
        WaveId::Wave2,
        WaveId::Wave3,
        WaveId::Wave4,
        WaveId::Wave5,
    ];

    /// Position of this wave in `ALL`
    pub fn index(self) -> usize {
        match self {
            WaveId::Wave1 => 0,
            WaveId::Wave2 => 1,
            WaveId::Wave3 => 2,
            WaveId::Wave4 => 3,
            WaveId::Wave5 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WaveId::Wave1 => "wave_1",
            WaveId::Wave2 => "wave_2",
            WaveId::Wave3 => "wave_3",
            WaveId::Wave4 => "wave_4",
            WaveId::Wave5 => "wave_5",
        }
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let num = s
            .strip_prefix("wave_")
            .or_else(|| s.strip_prefix("wave"))
            .unwrap_or(s.as_str());
        match num.trim() {
            "1" | "i" => Ok(WaveId::Wave1),
            "2" | "ii" => Ok(WaveId::Wave2),
            "3" | "iii" => Ok(WaveId::Wave3),
            "4" | "iv" => Ok(WaveId::Wave4),
            "5" | "v" => Ok(WaveId::Wave5),
            _ => Err(format!("unknown wave: {}", s)),
        }
    }
}

/// Expected time interval of a wave, in milliseconds (both ends inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveWindow {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl WaveWindow {
    pub const fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }
}

/// The five named wave windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveWindows {
    pub wave_1: WaveWindow,
    pub wave_2: WaveWindow,
    pub wave_3: WaveWindow,
    pub wave_4: WaveWindow,
    pub wave_5: WaveWindow,
}

impl WaveWindows {
    pub fn get(&self, wave: WaveId) -> &WaveWindow {
        match wave {
            WaveId::Wave1 => &self.wave_1,
            WaveId::Wave2 => &self.wave_2,
            WaveId::Wave3 => &self.wave_3,
            WaveId::Wave4 => &self.wave_4,
            WaveId::Wave5 => &self.wave_5,
        }
    }

    pub fn get_mut(&mut self, wave: WaveId) -> &mut WaveWindow {
        match wave {
            WaveId::Wave1 => &mut self.wave_1,
            WaveId::Wave2 => &mut self.wave_2,
            WaveId::Wave3 => &mut self.wave_3,
            WaveId::Wave4 => &mut self.wave_4,
            WaveId::Wave5 => &mut self.wave_5,
        }
    }

    /// Windows paired with their wave, in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (WaveId, &WaveWindow)> {
        WaveId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }
}

impl Default for WaveWindows {
    fn default() -> Self {
        Self {
            wave_1: WaveWindow::new(1.0, 1.8),
            wave_2: WaveWindow::new(1.8, 2.5),
            wave_3: WaveWindow::new(2.5, 3.5),
            wave_4: WaveWindow::new(3.5, 4.7),
            // Starts late so the tail of wave IV is not picked up as wave V
            wave_5: WaveWindow::new(5.6, 10.2),
        }
    }
}

/// Peak search and threshold relaxation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Amplitude a peak must exceed on the first pass
    pub initial_threshold: f64,
    /// Multiplier applied to the threshold after a pass with no detections
    pub threshold_decay: f64,
    /// Maximum number of passes over all windows
    pub max_attempts: usize,
    /// Samples on each side a peak must strictly dominate
    pub half_window: usize,
    /// Duration after the peak searched for the trough, in milliseconds
    pub trough_search_ms: f64,
    /// Allowed relative deviation between sampling intervals
    pub sampling_tolerance: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            initial_threshold: DEFAULT_INITIAL_THRESHOLD,
            threshold_decay: DEFAULT_THRESHOLD_DECAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            half_window: DEFAULT_HALF_WINDOW,
            trough_search_ms: DEFAULT_TROUGH_SEARCH_MS,
            sampling_tolerance: DEFAULT_SAMPLING_TOLERANCE,
        }
    }
}

/// Complete analysis configuration
///
/// # Example
/// ```
/// use abrwave::config::{AnalysisConfig, WaveId};
///
/// let mut config = AnalysisConfig::default();
/// config.detection.max_attempts = 20;
/// config.windows.get_mut(WaveId::Wave5).end_ms = 9.0;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub windows: WaveWindows,
    pub detection: DetectionConfig,
}

impl AnalysisConfig {
    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| AbrError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AbrError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;

        if !d.initial_threshold.is_finite() {
            return Err(AbrError::Config(
                "initial_threshold must be finite".to_string(),
            ));
        }
        if !(d.threshold_decay > 0.0 && d.threshold_decay <= 1.0) {
            return Err(AbrError::Config(format!(
                "threshold_decay must be in (0, 1], got {}",
                d.threshold_decay
            )));
        }
        if d.max_attempts == 0 {
            return Err(AbrError::Config("max_attempts must be at least 1".to_string()));
        }
        if d.half_window == 0 {
            return Err(AbrError::Config("half_window must be at least 1".to_string()));
        }
        if !(d.trough_search_ms.is_finite() && d.trough_search_ms > 0.0) {
            return Err(AbrError::Config(format!(
                "trough_search_ms must be positive, got {}",
                d.trough_search_ms
            )));
        }
        if !(d.sampling_tolerance.is_finite() && d.sampling_tolerance >= 0.0) {
            return Err(AbrError::Config(format!(
                "sampling_tolerance must be non-negative, got {}",
                d.sampling_tolerance
            )));
        }

        for (wave, window) in self.windows.iter() {
            if !(window.start_ms.is_finite() && window.end_ms.is_finite()) {
                return Err(AbrError::Config(format!("{} window must be finite", wave)));
            }
            if window.start_ms >= window.end_ms {
                return Err(AbrError::Config(format!(
                    "{} window start {} must be before end {}",
                    wave, window.start_ms, window.end_ms
                )));
            }
        }

        Ok(())
    }
}
