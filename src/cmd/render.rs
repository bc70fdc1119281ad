//! Output rendering. Pure: envelope or error in, one string out.
//!
//! `json` is the machine path: the body exactly as received (or as collected
//! by the paginator), pretty-printed, key order preserved. `table` is a lossy
//! human view of `data`.

use serde_json::{Map, Value};

use super::bind::OutputFormat;
use super::format::{Role, StyleOptions, TableOpts, box_header, color, table, truncate_ellipsis};
use crate::api::{PageInfo, ResultEnvelope};
use crate::error::CliError;

/// Longest cell, in characters, before truncation.
pub const MAX_CELL_CHARS: usize = 50;

const NO_RESULTS: &str = "No results";

pub fn render_success(envelope: &ResultEnvelope, format: OutputFormat, style: &StyleOptions) -> String {
    match format {
        OutputFormat::Json => format!("{:#}", envelope.body()),
        OutputFormat::Table => render_table(envelope, style),
    }
}

/// `{outcome, message, status?, page?}` for JSON, a boxed report for tables.
pub fn render_failure(err: &CliError, format: OutputFormat, style: &StyleOptions) -> String {
    match format {
        OutputFormat::Json => {
            let mut payload = Map::new();
            payload.insert("outcome".into(), Value::String(err.outcome().as_str().into()));
            payload.insert("message".into(), Value::String(err.message()));
            if let Some(status) = err.status() {
                payload.insert("status".into(), status.into());
            }
            if let Some(page) = err.page() {
                payload.insert("page".into(), page.into());
            }
            format!("{:#}", Value::Object(payload))
        }
        OutputFormat::Table => {
            let mut out = box_header("Error", Some(err.outcome().as_str()), Role::Error, style);
            out.push('\n');
            out.push_str(&err.message());
            if let Some(status) = err.status() {
                out.push('\n');
                out.push_str(&color(Role::Dim, format!("HTTP {status}"), style));
            }
            if let Some(page) = err.page() {
                out.push('\n');
                out.push_str(&color(Role::Dim, format!("while fetching page {page}"), style));
            }
            out
        }
    }
}

fn render_table(envelope: &ResultEnvelope, style: &StyleOptions) -> String {
    let opts = TableOpts::default();
    let mut out = match envelope.data() {
        Value::Array(rows) if rows.is_empty() => NO_RESULTS.to_string(),
        Value::Array(rows) if rows.iter().all(Value::is_object) => {
            let columns = union_of_keys(rows);
            let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
            let body: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .map(|c| row.get(c).map(cell).unwrap_or_default())
                        .collect()
                })
                .collect();
            table(&headers, &body, opts, style)
        }
        Value::Array(rows) => {
            let body: Vec<Vec<String>> = rows.iter().map(|v| vec![cell(v)]).collect();
            table(&["VALUE"], &body, opts, style)
        }
        Value::Object(fields) if fields.is_empty() => NO_RESULTS.to_string(),
        Value::Object(fields) => {
            let body: Vec<Vec<String>> = fields
                .iter()
                .map(|(k, v)| vec![k.clone(), cell(v)])
                .collect();
            table(&["KEY", "VALUE"], &body, opts, style)
        }
        scalar => cell(scalar),
    };

    if let Some(footer) = envelope.pagination().and_then(|info| footer(&info)) {
        out.push('\n');
        out.push_str(&color(Role::Dim, footer, style));
    }
    out
}

/// Column names in first-seen order across all rows.
fn union_of_keys(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.replace(['\n', '\r', '\t'], " "),
        // Nested values render as compact JSON.
        other => other.to_string(),
    };
    truncate_ellipsis(&text, MAX_CELL_CHARS)
}

fn footer(info: &PageInfo) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(offset) = info.offset {
        parts.push(format!("offset {offset}"));
    }
    if let Some(limit) = info.limit {
        parts.push(format!("limit {limit}"));
    }
    if let Some(total) = info.total {
        parts.push(format!("total {total}"));
    }
    if info.next_path.is_some() {
        parts.push("more available".to_string());
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}
