//! Non-fatal inspection of the requirement table returned by the model.
//!
//! The response is always written to disk exactly as received. This module
//! only parses a copy with the `csv` crate and reports rows that do not have
//! the two expected fields (`code`, `description`) and codes that occur more
//! than once, so a bad table shows up in the logs instead of in Excel.

use std::collections::HashSet;
use tracing::{debug, warn};

/// Summary of how well a response matches the two-column contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvReport {
    /// Data rows parsed (header excluded).
    pub records: usize,
    /// Whether the first row was a `code,description` header.
    pub has_header: bool,
    /// 1-based line numbers of rows whose field count is not 2.
    pub malformed_lines: Vec<u64>,
    /// Codes seen more than once, in first-duplicate order.
    pub duplicate_codes: Vec<String>,
    /// Parser error that stopped inspection early, if any.
    pub parse_error: Option<String>,
}

impl CsvReport {
    pub fn is_clean(&self) -> bool {
        self.records > 0
            && self.malformed_lines.is_empty()
            && self.duplicate_codes.is_empty()
            && self.parse_error.is_none()
    }

    /// Emit one WARN line per problem; DEBUG when clean.
    pub fn log(&self) {
        if self.is_clean() {
            debug!("Requirement table looks well-formed: {} rows", self.records);
            return;
        }
        if self.records == 0 {
            warn!("Model response contains no requirement rows");
        }
        if !self.malformed_lines.is_empty() {
            warn!(
                "{} row(s) do not have exactly 2 fields (lines {:?})",
                self.malformed_lines.len(),
                self.malformed_lines
            );
        }
        if !self.duplicate_codes.is_empty() {
            warn!(
                "Duplicate requirement codes: {}",
                self.duplicate_codes.join(", ")
            );
        }
        if let Some(ref e) = self.parse_error {
            warn!("Response is not valid CSV: {}", e);
        }
    }
}

/// Parse `text` leniently and report deviations from the two-column table.
///
/// Markdown code fences around the table are ignored for inspection.
pub fn inspect_requirements_csv(text: &str) -> CsvReport {
    let body = strip_fence_lines(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut report = CsvReport::default();
    let mut seen = HashSet::new();
    let mut first = true;

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.parse_error = Some(e.to_string());
                break;
            }
        };

        if first {
            first = false;
            if record
                .get(0)
                .is_some_and(|f| f.eq_ignore_ascii_case("code"))
            {
                report.has_header = true;
                continue;
            }
        }

        report.records += 1;
        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            report.malformed_lines.push(line);
        }

        if let Some(code) = record.get(0).filter(|c| !c.is_empty()) {
            if !seen.insert(code.to_string()) && !report.duplicate_codes.iter().any(|d| d == code)
            {
                report.duplicate_codes.push(code.to_string());
            }
        }
    }

    report
}

fn strip_fence_lines(text: &str) -> String {
    text.lines()
        .filter(|l| !l.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}
