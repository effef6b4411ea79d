//! CSV loading for recorded ABR traces.
//!
//! A recording is a signal CSV with one column per electrode and a time CSV
//! whose first column holds timestamps in milliseconds. The first row of each
//! file is its header and is never read as data, even when the column labels
//! are numbers. Empty or non-numeric cells are ignored when averaging
//! electrodes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AbrError, Result};
use crate::trace::Trace;

/// An electrode-averaged recording ready for analysis
#[derive(Debug, Clone)]
pub struct Recording {
    /// File name up to the first `.`
    pub id: String,
    /// Most electrode columns seen in any row
    pub electrode_count: usize,
    pub trace: Trace,
}

/// Load and average a signal CSV against a time CSV
///
/// Both sequences are truncated to the shorter length and the time axis is
/// shifted to start at zero.
pub fn load_recording<P: AsRef<Path>, Q: AsRef<Path>>(
    signal_path: P,
    time_path: Q,
    sampling_tolerance: f64,
) -> Result<Recording> {
    let signal_path = signal_path.as_ref();
    let TimeAxis {
        values: mut time_ms,
        resolution_ms,
    } = read_time_axis(time_path)?;
    let rows = read_electrode_rows(signal_path)?;

    let electrode_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut signal = average_rows(&rows);

    let len = time_ms.len().min(signal.len());
    if len < time_ms.len().max(signal.len()) {
        log::debug!(
            "{}: truncating to {} samples (time {}, signal {})",
            signal_path.display(),
            len,
            time_ms.len(),
            signal.len()
        );
    }
    time_ms.truncate(len);
    signal.truncate(len);
    zero_base(&mut time_ms);

    let trace = Trace::with_resolution(signal, time_ms, sampling_tolerance, resolution_ms)?;

    Ok(Recording {
        id: recording_id(signal_path),
        electrode_count,
        trace,
    })
}

/// Timestamps read from a time CSV
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub values: Vec<f64>,
    /// Step of the last printed decimal place, 0 when stamps are whole or
    /// in exponent notation
    pub resolution_ms: f64,
}

/// Timestamps from the first column of a CSV
pub fn read_time_axis<P: AsRef<Path>>(path: P) -> Result<TimeAxis> {
    let path = path.as_ref();
    let rows = read_rows(path)?;
    let mut values = Vec::with_capacity(rows.len());
    let mut decimals = 0;

    for (line, cells) in rows {
        let first = cells.first().map(|s| s.as_str()).unwrap_or("");
        let value: f64 = first.parse().map_err(|_| AbrError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("invalid time value '{}'", first),
        })?;
        decimals = decimals.max(decimal_places(first));
        values.push(value);
    }

    let resolution_ms = if decimals == 0 {
        0.0
    } else {
        10f64.powi(-(decimals as i32))
    };
    Ok(TimeAxis {
        values,
        resolution_ms,
    })
}

/// Digits after the decimal point of a plain decimal literal
fn decimal_places(text: &str) -> usize {
    if text.contains(['e', 'E']) {
        return 0;
    }
    text.split_once('.')
        .map(|(_, frac)| frac.chars().take_while(char::is_ascii_digit).count())
        .unwrap_or(0)
}

/// Numeric cells of each data row of a multi-electrode signal CSV
pub fn read_electrode_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let rows = read_rows(path)?;
    let mut out = Vec::with_capacity(rows.len());

    for (line, cells) in rows {
        let values: Vec<f64> = cells
            .iter()
            .filter_map(|c| c.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            return Err(AbrError::Parse {
                path: path.to_path_buf(),
                line,
                message: "row has no numeric values".to_string(),
            });
        }
        out.push(values);
    }

    Ok(out)
}

/// Mean of each row
pub fn average_rows(rows: &[Vec<f64>]) -> Vec<f64> {
    rows.iter()
        .map(|r| r.iter().sum::<f64>() / r.len().max(1) as f64)
        .collect()
}

/// Shift timestamps so the first one is zero
pub fn zero_base(time_ms: &mut [f64]) {
    if let Some(&t0) = time_ms.first() {
        for t in time_ms.iter_mut() {
            *t -= t0;
        }
    }
}

/// Recording identifier: the file name up to its first `.`
pub fn recording_id(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split a CSV into trimmed cells, keeping 1-based line numbers
///
/// Blank lines and `#` comments are dropped. The first remaining row is the
/// header and is dropped as well.
fn read_rows(path: &Path) -> Result<Vec<(usize, Vec<String>)>> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let reader = BufReader::new(file);
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    let mut header_seen = false;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| io_error(path, source))?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !header_seen {
            header_seen = true;
            log::trace!("{}: header '{}'", path.display(), line);
            continue;
        }

        let cells: Vec<String> = line.split(',').map(|s| s.trim().to_string()).collect();
        rows.push((line_num + 1, cells));
    }

    Ok(rows)
}

fn io_error(path: &Path, source: std::io::Error) -> AbrError {
    AbrError::Io {
        path: PathBuf::from(path),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_id() {
        assert_eq!(recording_id(Path::new("data/215.csv")), "215");
        assert_eq!(recording_id(Path::new("mouse.7.csv")), "mouse");
        assert_eq!(recording_id(Path::new("plain")), "plain");
    }

    #[test]
    fn test_zero_base() {
        let mut time = vec![2.5, 2.6, 2.7];
        zero_base(&mut time);
        assert_eq!(time[0], 0.0);
        assert!((time[2] - 0.2).abs() < 1e-12);

        let mut empty: Vec<f64> = Vec::new();
        zero_base(&mut empty);
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places("0.041"), 3);
        assert_eq!(decimal_places("12"), 0);
        assert_eq!(decimal_places("-1.50"), 2);
        assert_eq!(decimal_places("4.1e-2"), 0);
    }

    #[test]
    fn test_average_rows() {
        let rows = vec![vec![1.0, 3.0], vec![2.0], vec![-1.0, 1.0, 3.0]];
        assert_eq!(average_rows(&rows), vec![2.0, 2.0, 1.0]);
    }
}
