mod csv;
mod json;
mod text;

use chrono::Utc;

use crate::abr::TraceResult;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Analysis outcome for one recording, as handed to a formatter
#[derive(Debug, Clone)]
pub struct TraceReport {
    pub id: String,
    /// Electrode label; `Average` for electrode-averaged traces
    pub electrode: String,
    pub result: Option<TraceResult>,
    pub error: Option<String>,
}

impl TraceReport {
    pub fn success(id: impl Into<String>, result: TraceResult) -> Self {
        Self {
            id: id.into(),
            electrode: "Average".to_string(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: impl Into<String>, error: impl ToString) -> Self {
        Self {
            id: id.into(),
            electrode: "Average".to_string(),
            result: None,
            error: Some(error.to_string()),
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, report: &TraceReport) -> String;

    fn header(&self) -> Option<String> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
