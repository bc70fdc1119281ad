//! Argument binding: raw flag values -> typed request.
//!
//! bind(op, &RawArgs) -> RequestEnvelope { operation, params, pagination, format }
//!
//! Every check here runs before any network call. A failure is always a
//! `CliError::Validation`.

use std::collections::BTreeMap;

use clap::parser::ValueSource;
use clap::{ArgMatches, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};

use super::catalog::{OperationDescriptor, ParamKind, ParamSpec};
use super::paginate::DEFAULT_PAGE_SIZE;
use crate::error::CliError;

pub const FORMAT_FLAG: &str = "format";
pub const LIMIT_FLAG: &str = "limit";
pub const OFFSET_FLAG: &str = "offset";
pub const ALL_FLAG: &str = "all";

const PAGING_FLAGS: [&str; 3] = [LIMIT_FLAG, OFFSET_FLAG, ALL_FLAG];

/// Global flags handled by the entry point, never forwarded to binding.
const GLOBAL_FLAGS: [&str; 2] = ["verbose", "quiet"];

/// Output rendering requested with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        <OutputFormat as ValueEnum>::from_str(raw.trim(), true).ok()
    }

    /// Best-effort `--format` lookup over an argv that may not parse at all,
    /// so that even usage errors are rendered in the requested format.
    pub fn sniff<S: AsRef<str>>(argv: &[S]) -> Option<Self> {
        let mut found = None;
        let mut args = argv.iter().map(AsRef::as_ref);
        while let Some(arg) = args.next() {
            if arg == "--" {
                break;
            }
            let value = if arg == "--format" {
                args.next()
            } else {
                arg.strip_prefix("--format=")
            };
            if let Some(format) = value.and_then(OutputFormat::parse) {
                found = Some(format);
            }
        }
        found
    }
}

/// Flag values exactly as typed, keyed by flag name without dashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs {
    values: BTreeMap<String, Vec<String>>,
}

impl RawArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every flag the user typed on an operation subcommand.
    /// Defaults filled in by clap are not included.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut raw = RawArgs::new();
        for id in matches.ids() {
            let id = id.as_str();
            if GLOBAL_FLAGS.contains(&id) {
                continue;
            }
            if matches.value_source(id) != Some(ValueSource::CommandLine) {
                continue;
            }
            if let Ok(Some(values)) = matches.try_get_raw(id) {
                for value in values {
                    raw.insert(id, value.to_string_lossy());
                }
            }
        }
        raw
    }

    pub fn with(mut self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(flag, value);
        self
    }

    pub fn insert(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.values.entry(flag.into()).or_default().push(value.into());
    }

    /// Last value given for `flag`.
    pub fn get(&self, flag: &str) -> Option<&str> {
        self.values
            .get(flag)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.values.contains_key(flag)
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `--format` if present and valid; used to render errors raised before
    /// binding completes.
    pub fn requested_format(&self) -> Option<OutputFormat> {
        self.get(FORMAT_FLAG).and_then(OutputFormat::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// A single page.
    Page { limit: u64, offset: u64 },
    /// Every page, concatenated.
    All,
}

/// A validated request, ready for the transport or the paginator.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub operation: &'static OperationDescriptor,
    /// Coerced parameters keyed by request-body name.
    pub params: Map<String, Value>,
    /// `None` for operations that are not paginated.
    pub pagination: Option<PageRequest>,
    pub format: OutputFormat,
}

impl RequestEnvelope {
    /// JSON body for a single call; single-page requests carry `limit`/`offset`.
    pub fn payload(&self) -> Map<String, Value> {
        let mut body = self.params.clone();
        if let Some(PageRequest::Page { limit, offset }) = self.pagination {
            body.insert(LIMIT_FLAG.to_string(), limit.into());
            body.insert(OFFSET_FLAG.to_string(), offset.into());
        }
        body
    }
}

pub fn bind(op: &'static OperationDescriptor, raw: &RawArgs) -> Result<RequestEnvelope, CliError> {
    for flag in raw.flags() {
        if PAGING_FLAGS.contains(&flag) {
            if !op.is_paginated() {
                return Err(CliError::Validation(format!(
                    "--{flag} is not supported by `{op}`: the operation is not paginated"
                )));
            }
        } else if flag != FORMAT_FLAG && op.param(flag).is_none() {
            return Err(CliError::Validation(format!(
                "unknown flag --{flag} for `{op}`"
            )));
        }
    }

    let format = match raw.get(FORMAT_FLAG) {
        Some(v) => OutputFormat::parse(v).ok_or_else(|| {
            CliError::Validation(format!(
                "invalid value `{v}` for --{FORMAT_FLAG}: expected json or table"
            ))
        })?,
        None => OutputFormat::default(),
    };

    let pagination = bind_pagination(op, raw)?;

    let mut params = Map::new();
    for spec in op.params {
        match raw.get(spec.flag) {
            Some(v) => {
                params.insert(spec.name.to_string(), coerce(spec, v)?);
            }
            None if spec.required => {
                return Err(CliError::Validation(format!(
                    "missing required flag --{} for `{op}`",
                    spec.flag
                )));
            }
            None => {}
        }
    }

    Ok(RequestEnvelope {
        operation: op,
        params,
        pagination,
        format,
    })
}

fn bind_pagination(
    op: &OperationDescriptor,
    raw: &RawArgs,
) -> Result<Option<PageRequest>, CliError> {
    if !op.is_paginated() {
        return Ok(None);
    }

    let all = match raw.get(ALL_FLAG) {
        Some(v) => parse_bool(v).ok_or_else(|| {
            CliError::Validation(format!("invalid value `{v}` for --{ALL_FLAG}: expected boolean"))
        })?,
        None => false,
    };
    let limit = raw
        .get(LIMIT_FLAG)
        .map(|v| parse_count(LIMIT_FLAG, v))
        .transpose()?;
    let offset = raw
        .get(OFFSET_FLAG)
        .map(|v| parse_count(OFFSET_FLAG, v))
        .transpose()?;

    if all {
        let clashing: Vec<String> = [LIMIT_FLAG, OFFSET_FLAG]
            .iter()
            .filter(|f| raw.contains(f))
            .map(|f| format!("--{f}"))
            .collect();
        if !clashing.is_empty() {
            return Err(CliError::Validation(format!(
                "conflicting pagination flags: --{ALL_FLAG} cannot be combined with {}",
                clashing.join(" or ")
            )));
        }
        return Ok(Some(PageRequest::All));
    }

    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 {
        return Err(CliError::Validation(format!(
            "invalid value `0` for --{LIMIT_FLAG}: must be at least 1"
        )));
    }
    Ok(Some(PageRequest::Page {
        limit,
        offset: offset.unwrap_or(0),
    }))
}

fn parse_count(flag: &str, raw: &str) -> Result<u64, CliError> {
    raw.trim().parse::<u64>().map_err(|_| {
        CliError::Validation(format!(
            "invalid value `{raw}` for --{flag}: expected a non-negative integer"
        ))
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Convert one raw value to the JSON shape its declared kind requires.
fn coerce(spec: &ParamSpec, raw: &str) -> Result<Value, CliError> {
    let invalid = || {
        CliError::Validation(format!(
            "invalid value `{raw}` for --{}: expected {}",
            spec.flag, spec.kind
        ))
    };
    match spec.kind {
        ParamKind::String => Ok(Value::String(raw.to_string())),
        ParamKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid()),
        ParamKind::Boolean => parse_bool(raw).map(Value::Bool).ok_or_else(invalid),
        ParamKind::Id => {
            let id = raw.trim();
            if id.is_empty() {
                Err(invalid())
            } else {
                Ok(Value::String(id.to_string()))
            }
        }
        ParamKind::Json => serde_json::from_str(raw).map_err(|e| {
            CliError::Validation(format!(
                "invalid value for --{}: expected JSON ({e})",
                spec.flag
            ))
        }),
        ParamKind::List => {
            let items: Vec<Value> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect();
            if items.is_empty() {
                Err(invalid())
            } else {
                Ok(Value::Array(items))
            }
        }
        ParamKind::File => std::fs::read_to_string(raw).map(Value::String).map_err(|e| {
            CliError::Validation(format!(
                "cannot read file `{raw}` for --{}: {e}",
                spec.flag
            ))
        }),
    }
}
