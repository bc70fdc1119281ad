//! End-to-end dispatcher behaviour against in-memory services.

use std::cell::{Cell, RefCell};

use outline_cli::api::{ResultEnvelope, Transport};
use outline_cli::cmd::{Catalog, Dispatcher, OperationDescriptor, Paginator, RawArgs, StyleOptions};
use outline_cli::config::{API_KEY_VAR, BASE_URL_VAR, ConfigResolver, ResolvedConfig};
use outline_cli::{CliError, OutcomeCode};
use serde_json::{Map, Value, json};

/// A wiki with five documents. `documents.list` pages through them,
/// `documents.info` knows only `doc-1`, everything else echoes its request.
struct FakeOutline {
    docs: Vec<Value>,
    calls: Cell<usize>,
    requests: RefCell<Vec<(String, Map<String, Value>)>>,
}

impl FakeOutline {
    fn new() -> Self {
        FakeOutline {
            docs: (1..=5)
                .map(|i| json!({"id": format!("doc-{i}"), "title": format!("Doc {i}")}))
                .collect(),
            calls: Cell::new(0),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for FakeOutline {
    fn call(
        &self,
        _config: &ResolvedConfig,
        op: &OperationDescriptor,
        params: &Map<String, Value>,
    ) -> Result<ResultEnvelope, CliError> {
        self.calls.set(self.calls.get() + 1);
        self.requests
            .borrow_mut()
            .push((op.path.to_string(), params.clone()));

        match op.path {
            "/documents.list" => {
                let limit = params["limit"].as_u64().unwrap() as usize;
                let offset = params["offset"].as_u64().unwrap() as usize;
                let page: Vec<Value> = self.docs.iter().skip(offset).take(limit).cloned().collect();
                ResultEnvelope::from_value(json!({
                    "pagination": {"limit": limit, "offset": offset},
                    "data": page,
                }))
            }
            "/documents.info" => match params["id"].as_str() {
                Some("doc-1") => ResultEnvelope::from_value(json!({"data": self.docs[0]})),
                _ => Err(CliError::NotFound(
                    "Not found: The requested resource does not exist".into(),
                )),
            },
            path if op.is_paginated() => {
                ResultEnvelope::from_value(json!({"data": [{"path": path}]}))
            }
            path => ResultEnvelope::from_value(json!({"data": {"path": path}})),
        }
    }
}

/// Always answers with a full page.
struct Endless {
    calls: Cell<usize>,
}

impl Transport for Endless {
    fn call(
        &self,
        _config: &ResolvedConfig,
        _op: &OperationDescriptor,
        params: &Map<String, Value>,
    ) -> Result<ResultEnvelope, CliError> {
        self.calls.set(self.calls.get() + 1);
        let limit = params["limit"].as_u64().unwrap() as usize;
        let page = vec![json!({"id": "x"}); limit];
        ResultEnvelope::from_value(json!({ "data": page }))
    }
}

fn resolver() -> ConfigResolver {
    ConfigResolver::from_vars([
        (BASE_URL_VAR, "https://wiki.example.com"),
        (API_KEY_VAR, "ol_api_test"),
    ])
}

fn dispatcher<T: Transport>(transport: T) -> Dispatcher<'static, T> {
    Dispatcher::new(Catalog::builtin(), resolver(), transport).with_style(StyleOptions::plain())
}

fn run<T: Transport>(
    d: &Dispatcher<'_, T>,
    group: &str,
    name: &str,
    raw: &RawArgs,
) -> (OutcomeCode, Value) {
    let mut out = Vec::new();
    let code = d.run(group, name, raw, &mut out);
    let payload = serde_json::from_slice(&out).expect("payload is JSON");
    (code, payload)
}

/// A value that binds for every kind of parameter.
fn sample_value(op: &OperationDescriptor, flag: &str) -> String {
    use outline_cli::cmd::ParamKind;
    match op.param(flag).map(|p| p.kind) {
        Some(ParamKind::Integer) => "1".into(),
        Some(ParamKind::Boolean) => "true".into(),
        Some(ParamKind::Json) => r#"{"type":"doc"}"#.into(),
        Some(ParamKind::List) => "https://a.example/cb".into(),
        Some(ParamKind::File) => file!().into(),
        _ => "doc-1".into(),
    }
}

fn required_args(op: &OperationDescriptor) -> RawArgs {
    op.params
        .iter()
        .filter(|p| p.required)
        .fold(RawArgs::new(), |raw, p| raw.with(p.flag, sample_value(op, p.flag)))
}

#[test]
fn every_operation_reaches_its_endpoint() {
    let d = dispatcher(FakeOutline::new());
    for op in Catalog::builtin().operations() {
        let before = d.transport().calls.get();
        let (code, _) = run(&d, op.group, op.name, &required_args(op));
        assert_eq!(code, OutcomeCode::Success, "{op}");
        assert_eq!(d.transport().calls.get(), before + 1, "{op}");
        let requests = d.transport().requests.borrow();
        assert_eq!(requests.last().map(|r| r.0.as_str()), Some(op.path), "{op}");
    }
}

#[test]
fn missing_required_param_never_calls_transport() {
    let d = dispatcher(FakeOutline::new());
    for op in Catalog::builtin().operations() {
        for missing in op.params.iter().filter(|p| p.required) {
            let raw = op
                .params
                .iter()
                .filter(|p| p.required && p.flag != missing.flag)
                .fold(RawArgs::new(), |raw, p| raw.with(p.flag, sample_value(op, p.flag)));
            let (code, payload) = run(&d, op.group, op.name, &raw);
            assert_eq!(code.exit_code(), 2, "{op} without --{}", missing.flag);
            assert_eq!(payload["outcome"], "validation_error");
            assert!(
                payload["message"].as_str().unwrap().contains(missing.flag),
                "{op}: {payload}"
            );
        }
    }
    assert_eq!(d.transport().calls.get(), 0);
}

#[test]
fn all_with_limit_is_rejected_for_every_paginated_operation() {
    let d = dispatcher(FakeOutline::new());
    let paginated = Catalog::builtin().operations().iter().filter(|op| op.is_paginated());
    let mut checked = 0;
    for op in paginated {
        let raw = required_args(op).with("all", "true").with("limit", "10");
        let (code, payload) = run(&d, op.group, op.name, &raw);
        assert_eq!(code, OutcomeCode::ValidationError, "{op}");
        assert!(
            payload["message"]
                .as_str()
                .unwrap()
                .contains("conflicting pagination flags"),
            "{op}: {payload}"
        );
        checked += 1;
    }
    assert!(checked > 20);
    assert_eq!(d.transport().calls.get(), 0);
}

#[test]
fn single_page_of_two() {
    let d = dispatcher(FakeOutline::new());
    let raw = RawArgs::new().with("limit", "2").with("offset", "0");
    let (code, payload) = run(&d, "documents", "list", &raw);
    assert_eq!(code, OutcomeCode::Success);
    assert_eq!(payload["data"].as_array().unwrap().len(), 2);
    assert_eq!(payload["pagination"]["offset"], 0);
    assert_eq!(payload["pagination"]["limit"], 2);
    assert_eq!(d.transport().calls.get(), 1);
}

#[test]
fn all_walks_two_two_one() {
    let d = dispatcher(FakeOutline::new()).with_paginator(Paginator::new(2, 100));
    let (code, payload) = run(&d, "documents", "list", &RawArgs::new().with("all", "true"));
    assert_eq!(code, OutcomeCode::Success);
    assert_eq!(d.transport().calls.get(), 3);

    let ids: Vec<&str> = payload["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["doc-1", "doc-2", "doc-3", "doc-4", "doc-5"]);
    assert_eq!(payload["pagination"]["total"], 5);
    assert!(payload["pagination"].get("nextPath").is_none());

    let offsets: Vec<u64> = d
        .transport()
        .requests
        .borrow()
        .iter()
        .map(|(_, p)| p["offset"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, [0, 2, 4]);
}

#[test]
fn all_equals_one_unbounded_page() {
    let d = dispatcher(FakeOutline::new()).with_paginator(Paginator::new(2, 100));
    let (_, all) = run(&d, "documents", "list", &RawArgs::new().with("all", "true"));
    let (_, single) = run(&d, "documents", "list", &RawArgs::new().with("limit", "1000"));
    assert_eq!(all["data"], single["data"]);
}

#[test]
fn endless_pages_hit_the_ceiling() {
    let d = dispatcher(Endless { calls: Cell::new(0) }).with_paginator(Paginator::new(3, 7));
    let (code, payload) = run(&d, "documents", "list", &RawArgs::new().with("all", "true"));
    assert_eq!(code, OutcomeCode::TransportError);
    assert_eq!(code.exit_code(), 6);
    assert!(payload["message"].as_str().unwrap().contains("did not terminate"));
    assert_eq!(d.transport().calls.get(), 7);
    assert!(payload.get("data").is_none());
}

#[test]
fn missing_api_key_is_config_error() {
    let d = Dispatcher::new(
        Catalog::builtin(),
        ConfigResolver::from_vars([(BASE_URL_VAR, "https://wiki.example.com")]),
        FakeOutline::new(),
    )
    .with_style(StyleOptions::plain());
    let (code, payload) = run(&d, "documents", "list", &RawArgs::new());
    assert_eq!(code.exit_code(), 2);
    assert_eq!(payload["outcome"], "config_error");
    assert!(payload["message"].as_str().unwrap().contains(API_KEY_VAR));
    assert_eq!(d.transport().calls.get(), 0);
}

#[test]
fn unknown_document_is_not_found() {
    let d = dispatcher(FakeOutline::new());
    let (code, payload) = run(&d, "documents", "info", &RawArgs::new().with("id", "bad-id"));
    assert_eq!(code, OutcomeCode::NotFoundError);
    assert_eq!(code.exit_code(), 4);
    assert_eq!(payload["outcome"], "not_found_error");
}

#[test]
fn json_output_round_trips_data() {
    let d = dispatcher(FakeOutline::new());
    let (_, payload) = run(&d, "documents", "info", &RawArgs::new().with("id", "doc-1"));
    assert_eq!(payload["data"], json!({"id": "doc-1", "title": "Doc 1"}));
}

#[test]
fn table_output_is_not_json() {
    let d = dispatcher(FakeOutline::new());
    let mut out = Vec::new();
    let raw = RawArgs::new().with("limit", "2").with("format", "table");
    assert_eq!(d.run("documents", "list", &raw, &mut out), OutcomeCode::Success);
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id     title");
    assert_eq!(lines[2], "doc-1  Doc 1");
    assert_eq!(lines[4], "offset 0, limit 2");
}
