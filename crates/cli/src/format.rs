//! Report → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one summary line per figure, then warnings
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use retarget_core::Error;
use retarget_engine::{RetargetReport, TransformSummary};
use std::error::Error as _;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format the report of a full run.
pub fn format_report(report: &RetargetReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(report),
        OutputMode::Human => {
            let mut lines = vec![
                format!("script types:       {}", report.script_types),
                format!("compiled types:     {}", report.compiled_types),
                format!("remapped:           {}", report.remapped),
            ];
            lines.extend(summary_lines(&report.transform));
            let warnings: Vec<String> = report
                .warnings()
                .map(|w| format!("(warning) {}", w))
                .collect();
            if !warnings.is_empty() {
                lines.push(format!("{} warning(s):", warnings.len()));
                lines.extend(warnings);
            }
            lines.join("\n")
        }
    }
}

/// Format the summary of a dry pass.
pub fn format_summary(summary: &TransformSummary, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(summary),
        OutputMode::Human => summary_lines(summary).join("\n"),
    }
}

/// Format an error with its whole cause chain.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        // some messages already embed their cause
        let text = cause.to_string();
        if !chain.contains(&text) {
            chain.push_str(": ");
            chain.push_str(&text);
        }
        source = cause.source();
    }
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({ "error": chain }))
            .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", chain)),
        OutputMode::Human => format!("(error) {}", chain),
    }
}

fn summary_lines(summary: &TransformSummary) -> Vec<String> {
    let mut lines = vec![
        format!("documents:          {}", summary.documents),
        format!("rewritten:          {}", summary.references_rewritten),
        format!("copied:             {}", summary.files_copied),
        format!("skipped:            {}", summary.files_skipped),
    ];
    if !summary.unrecognized_extensions.is_empty() {
        let exts: Vec<&str> = summary
            .unrecognized_extensions
            .iter()
            .map(String::as_str)
            .collect();
        lines.push(format!("unrecognized:       {}", exts.join(" ")));
    }
    lines
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_core::Diagnostic;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn human_report_lists_warnings() {
        let mut report = RetargetReport {
            script_types: 3,
            ..Default::default()
        };
        report.diagnostics.push(Diagnostic::UnresolvedScript {
            path: PathBuf::from("Helpers.cs"),
        });
        let text = format_report(&report, OutputMode::Human);
        assert!(text.contains("script types:       3"));
        assert!(text.contains("1 warning(s):"));
        assert!(text.contains("(warning) "));
    }

    #[test]
    fn json_report_is_parseable() {
        let report = RetargetReport::default();
        let text = format_report(&report, OutputMode::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["remapped"], 0);
        assert_eq!(value["transform"]["documents"], 0);
    }

    #[test]
    fn error_includes_cause() {
        let err = Error::io("a/b", io::Error::new(io::ErrorKind::Other, "disk gone"));
        let text = format_error(&err, OutputMode::Human);
        assert!(text.starts_with("(error) I/O error at "));
        assert!(text.ends_with(": disk gone"));
    }
}
