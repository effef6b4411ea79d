use super::{Formatter, TraceReport};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &TraceReport) -> String {
        let mut out = format!("Recording {} ({})", report.id, report.electrode);

        if let Some(ref err) = report.error {
            out.push_str(&format!("\n  ERROR: {}", err));
            return out;
        }
        let Some(ref result) = report.result else {
            return out;
        };

        for (wave, detection) in result.waves() {
            match detection {
                Some(d) if self.verbose => out.push_str(&format!(
                    "\n  {}: latency {:>6.3} ms  amplitude {:>9.5}  [peak {}, trough {}]",
                    wave, d.latency_ms, d.amplitude, d.peak_index, d.trough_index
                )),
                Some(d) => out.push_str(&format!(
                    "\n  {}: latency {:>6.3} ms  amplitude {:>9.5}",
                    wave, d.latency_ms, d.amplitude
                )),
                None => out.push_str(&format!("\n  {}: -", wave)),
            }
        }

        let ipi = result
            .interpeak_1_5()
            .map_or("-".to_string(), |v| format!("{:.3} ms", v));
        out.push_str(&format!("\n  I-V interpeak: {}", ipi));

        if self.verbose {
            let threshold = result
                .threshold()
                .map_or("-".to_string(), |t| format!("{:.5}", t));
            out.push_str(&format!(
                "\n  attempts: {}, threshold: {}",
                result.attempts(),
                threshold
            ));
        }

        out
    }
}
