use std::fs;
use std::path::{Path, PathBuf};

/// Zero-based time axis with a fixed interval
pub fn uniform_time(num_samples: usize, interval_ms: f64) -> Vec<f64> {
    (0..num_samples).map(|i| i as f64 * interval_ms).collect()
}

/// Sum of Gaussians evaluated on `time`; each component is
/// `(center_ms, height, sigma_ms)`, negative heights giving dips
pub fn gaussian_trace(time: &[f64], components: &[(f64, f64, f64)]) -> Vec<f64> {
    time.iter()
        .map(|&t| {
            components
                .iter()
                .map(|&(center, height, sigma)| {
                    let z = (t - center) / sigma;
                    height * (-0.5 * z * z).exp()
                })
                .sum()
        })
        .collect()
}

/// Fresh per-test scratch directory under the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("abrwave_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Write a CSV with a header line and one row per entry
pub fn write_csv(path: &Path, header: &str, rows: &[Vec<f64>]) {
    let mut content = String::new();
    content.push_str(header);
    content.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{}", v)).collect();
        content.push_str(&cells.join(","));
        content.push('\n');
    }
    fs::write(path, content).expect("write csv");
}
