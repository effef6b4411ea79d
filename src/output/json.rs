use serde::Serialize;

use super::{Formatter, TraceReport, iso8601_timestamp};
use crate::abr::TraceResult;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonRecord<'a> {
    ts: String,
    id: &'a str,
    electrode: &'a str,
    #[serde(flatten)]
    result: Option<&'a TraceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &TraceReport) -> String {
        let record = JsonRecord {
            ts: iso8601_timestamp(),
            id: &report.id,
            electrode: &report.electrode,
            result: report.result.as_ref(),
            error: report.error.as_deref(),
        };
        serde_json::to_string(&record).unwrap_or_else(|e| {
            format!(
                r#"{{"id":{:?},"error":"serialization failed: {}"}}"#,
                report.id, e
            )
        })
    }
}
