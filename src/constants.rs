//! Default detection parameters
//!
//! These are the values used by `AnalysisConfig::default()`. Any of them can
//! be overridden through a TOML config file or on the command line.

/// Threshold of the first detection pass, in signal units.
pub const DEFAULT_INITIAL_THRESHOLD: f64 = 0.05;

/// Factor applied to the threshold after a pass that found nothing.
pub const DEFAULT_THRESHOLD_DECAY: f64 = 0.95;

/// Upper bound on detection passes over the five windows.
pub const DEFAULT_MAX_ATTEMPTS: usize = 11;

/// Neighbours required on each side of a peak candidate.
pub const DEFAULT_HALF_WINDOW: usize = 3;

/// Duration after a peak searched for its trough, in milliseconds.
pub const DEFAULT_TROUGH_SEARCH_MS: f64 = 0.5;

/// Maximum relative deviation of any sampling interval from the median one.
pub const DEFAULT_SAMPLING_TOLERANCE: f64 = 1e-3;

/// Slack added before truncating a duration to a sample count, so that
/// 0.5 / 0.01 evaluating to 49.999... still yields 50 samples.
pub const SAMPLE_COUNT_EPSILON: f64 = 1e-9;
