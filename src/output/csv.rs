use super::{Formatter, TraceReport};
use crate::config::WaveId;

pub struct CsvFormatter;

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or(String::new(), |v| v.to_string())
}

impl Formatter for CsvFormatter {
    fn format(&self, report: &TraceReport) -> String {
        let mut fields = vec![report.id.clone(), report.electrode.clone()];

        for wave in WaveId::ALL {
            let detection = report.result.as_ref().and_then(|r| r.wave(wave));
            fields.push(opt(detection.map(|d| format!("{:.4}", d.latency_ms))));
            fields.push(opt(detection.map(|d| format!("{:.6}", d.amplitude))));
            fields.push(opt(detection.map(|d| d.peak_index)));
            fields.push(opt(detection.map(|d| d.trough_index)));
        }

        let result = report.result.as_ref();
        fields.push(opt(
            result
                .and_then(|r| r.interpeak_1_5())
                .map(|v| format!("{:.4}", v)),
        ));
        fields.push(opt(result.map(|r| r.attempts())));
        fields.push(opt(
            result
                .and_then(|r| r.threshold())
                .map(|v| format!("{:.6}", v)),
        ));
        // Commas would split the error message across columns
        fields.push(report.error.as_deref().unwrap_or("").replace(',', ";"));

        fields.join(",")
    }

    fn header(&self) -> Option<String> {
        let mut columns = vec!["id".to_string(), "electrode".to_string()];
        for wave in WaveId::ALL {
            for suffix in ["latency", "amplitude", "peak_bin", "trough_bin"] {
                columns.push(format!("{}_{}", wave, suffix));
            }
        }
        columns.extend(["interpeak_1_5", "attempts", "threshold", "error"].map(String::from));
        Some(columns.join(","))
    }
}
