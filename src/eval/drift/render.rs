//! HTML rendering of drift results.

use serde::{Deserialize, Serialize};

use super::types::{ColumnDrift, DriftSummary, Severity};

/// A report artifact ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderedReport {
    pub title: String,
    pub html: String,
}

impl RenderedReport {
    pub fn new(title: impl Into<String>, html: impl Into<String>) -> Self {
        Self { title: title.into(), html: html.into() }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::None => "ok",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
    }
}

/// Render one table row per column test.
pub fn render_html(title: &str, results: &[ColumnDrift], summary: &DriftSummary) -> RenderedReport {
    let verdict = if summary.has_critical() { "Drift detected" } else { "No drift detected" };

    let mut rows = String::new();
    for r in results {
        let p_value = r.p_value.map_or_else(|| "-".to_string(), |p| format!("{p:.4}"));
        rows.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{:.4}</td><td>{}</td><td>{:.4}</td><td>{:?}</td></tr>\n",
            severity_class(r.severity),
            escape(&r.column),
            r.test.name(),
            r.statistic,
            p_value,
            r.test.threshold(),
            r.severity,
        ));
    }

    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\nbody {{ font-family: sans-serif; }}\ntable {{ border-collapse: collapse; }}\n\
         td, th {{ border: 1px solid #ccc; padding: 4px 8px; }}\n\
         tr.warning {{ background: #fff4ce; }}\ntr.critical {{ background: #fde7e9; }}\n</style>\n\
         </head>\n<body>\n<h1>{title}</h1>\n<p><strong>{verdict}</strong>: {drifted} drifted column(s), \
         {critical} critical and {warnings} warning test(s) out of {total}.</p>\n<table>\n\
         <tr><th>Column</th><th>Test</th><th>Statistic</th><th>p-value</th><th>Threshold</th><th>Severity</th></tr>\n\
         {rows}</table>\n</body>\n</html>\n",
        title = escape(title),
        drifted = summary.drifted_columns,
        critical = summary.critical,
        warnings = summary.warnings,
        total = summary.total_tests,
    );
    RenderedReport::new(title, html)
}
