//! HTTP transport over reqwest.
//!
//! Every Outline endpoint is `POST <base>/api/<group>.<action>` with a JSON
//! body and a bearer token. Redirects are never followed: a 3xx is turned into
//! a `{success, location, data: {url}}` envelope instead.
//!
//! Ctrl-C is watched for the lifetime of the transport, so an interrupt that
//! lands between two `--all` pages cancels the next request too.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::header::{ACCEPT, LOCATION, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tokio::sync::watch;

use super::{ResultEnvelope, Transport};
use crate::cmd::catalog::OperationDescriptor;
use crate::config::ResolvedConfig;
use crate::error::CliError;

const USER_AGENT: &str = concat!("outline-cli/", env!("CARGO_PKG_VERSION"));

/// Blocking facade over an async client. Owns the runtime it drives.
pub struct HttpTransport {
    runtime: tokio::runtime::Runtime,
    client: Client,
    cancelled: Arc<watch::Sender<bool>>,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        let cancelled = Arc::new(watch::Sender::new(false));
        let listener = Arc::clone(&cancelled);
        runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received");
                listener.send_replace(true);
            }
        });

        Ok(HttpTransport {
            runtime,
            client,
            cancelled,
        })
    }

    /// Fail the in-flight request, if any, and every later one.
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }
}

impl Transport for HttpTransport {
    fn call(
        &self,
        config: &ResolvedConfig,
        op: &OperationDescriptor,
        params: &Map<String, Value>,
    ) -> Result<ResultEnvelope, CliError> {
        let url = config.endpoint(op.path)?;
        tracing::debug!(operation = %op, %url, "POST");
        let body = serde_json::Value::Object(params.clone());
        tracing::trace!(%body, "request body");

        let mut cancelled = self.cancelled.subscribe();
        if *cancelled.borrow() {
            return Err(cancelled_error());
        }

        let request = self
            .client
            .post(url)
            .bearer_auth(config.api_key.expose())
            .header(ACCEPT, "application/json")
            .json(params)
            .timeout(config.timeout);
        let timeout = config.timeout;

        let reply = self.runtime.block_on(async move {
            tokio::select! {
                reply = send(request, timeout) => reply,
                Ok(_) = cancelled.wait_for(|c| *c) => Err(cancelled_error()),
            }
        })?;
        tracing::debug!(operation = %op, status = reply.status, "response");
        classify(reply)
    }
}

/// The parts of a response that classification looks at.
#[derive(Debug, Clone, Default)]
pub(crate) struct Reply {
    pub status: u16,
    pub location: Option<String>,
    pub retry_after: Option<String>,
    pub body: String,
}

async fn send(request: RequestBuilder, timeout: Duration) -> Result<Reply, CliError> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(&e, timeout))?;
    let status = response.status().as_u16();
    let location = header(&response, LOCATION);
    let retry_after = header(&response, RETRY_AFTER);
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(&e, timeout))?;
    Ok(Reply {
        status,
        location,
        retry_after,
        body,
    })
}

fn header(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn cancelled_error() -> CliError {
    CliError::Transport("request cancelled".into())
}

fn transport_error(err: &reqwest::Error, timeout: Duration) -> CliError {
    if err.is_timeout() {
        return CliError::Transport(format!(
            "request timed out after {}s",
            timeout.as_secs_f64()
        ));
    }
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    if err.is_connect() {
        CliError::Transport(format!("connection error: {detail}"))
    } else {
        CliError::Transport(format!("request failed: {detail}"))
    }
}

/// Map a status and body to an envelope or a typed failure.
pub(crate) fn classify(reply: Reply) -> Result<ResultEnvelope, CliError> {
    let Reply {
        status,
        location,
        retry_after,
        body,
    } = reply;
    let remote = remote_message(&body);
    match status {
        200..=299 => ResultEnvelope::from_body(&body),
        300..=399 => match location.filter(|l| !l.trim().is_empty()) {
            Some(location) => Ok(ResultEnvelope::redirect(&location)),
            None => Err(CliError::unknown_api(
                Some(status),
                format!("HTTP {status}: redirect without a Location header"),
            )),
        },
        401 => Err(CliError::Auth(remote.unwrap_or_else(|| {
            "Unauthenticated: Invalid or missing API key".into()
        }))),
        403 => Err(CliError::Permission(remote.unwrap_or_else(|| {
            "Unauthorized: You don't have permission for this action".into()
        }))),
        404 => Err(CliError::NotFound(remote.unwrap_or_else(|| {
            "Not found: The requested resource does not exist".into()
        }))),
        429 => {
            let mut message = remote.unwrap_or_else(|| "Rate limited: Too many requests".into());
            if let Some(after) = retry_after.filter(|v| !v.trim().is_empty()) {
                message.push_str(&format!(" (retry after {})", after.trim()));
            }
            Err(CliError::RateLimited(message))
        }
        _ => {
            let message = remote.unwrap_or_else(|| match body.trim() {
                "" => format!("HTTP {status}"),
                text => text.to_string(),
            });
            Err(CliError::unknown_api(Some(status), message))
        }
    }
}

/// `message`, else `error`, from a JSON error body.
fn remote_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::catalog::Catalog;
    use crate::error::OutcomeCode;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn reply(status: u16, body: &str) -> Reply {
        Reply {
            status,
            body: body.to_string(),
            ..Reply::default()
        }
    }

    #[test]
    fn classify_known_statuses() {
        let cases = [
            (401, OutcomeCode::AuthError),
            (403, OutcomeCode::PermissionError),
            (404, OutcomeCode::NotFoundError),
            (429, OutcomeCode::RateLimitError),
            (400, OutcomeCode::UnknownApiError),
            (500, OutcomeCode::UnknownApiError),
            (502, OutcomeCode::UnknownApiError),
        ];
        for (status, outcome) in cases {
            let err = classify(reply(status, "")).unwrap_err();
            assert_eq!(err.outcome(), outcome, "HTTP {status}");
        }
    }

    #[test]
    fn unknown_failure_keeps_remote_message_verbatim() {
        let err = classify(reply(
            400,
            r#"{"ok":false,"error":"validation_error","message":"title: Must be 100 characters or less"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "title: Must be 100 characters or less");
        assert_eq!(err.status(), Some(400));

        let err = classify(reply(500, "upstream exploded")).unwrap_err();
        assert_eq!(err.to_string(), "upstream exploded");

        let err = classify(reply(503, "")).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn known_failures_prefer_remote_message() {
        let err = classify(reply(404, r#"{"message":"Document not found"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "Document not found");
        let err = classify(reply(401, "<html>nope</html>")).unwrap_err();
        assert_eq!(err.to_string(), "Unauthenticated: Invalid or missing API key");
    }

    #[test]
    fn rate_limit_mentions_retry_after() {
        let err = classify(Reply {
            status: 429,
            retry_after: Some("30".into()),
            ..Reply::default()
        })
        .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::RateLimitError);
        assert!(err.to_string().contains("retry after 30"), "{err}");
    }

    #[test]
    fn redirect_becomes_envelope() {
        let env = classify(Reply {
            status: 302,
            location: Some("https://files.example.com/x.png".into()),
            ..Reply::default()
        })
        .unwrap();
        assert_eq!(env.data(), &json!({"url": "https://files.example.com/x.png"}));

        let err = classify(reply(302, "")).unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::UnknownApiError);
    }

    #[test]
    fn success_with_malformed_body() {
        let err = classify(reply(200, "<html></html>")).unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::UnknownApiError);
    }

    /* ---- over a real socket ---- */

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        key.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answers one request with `status` and `body`, returning what it received.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn documents_info() -> &'static OperationDescriptor {
        Catalog::builtin().lookup("documents", "info").unwrap()
    }

    fn params() -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("id".into(), json!("doc-1"));
        params
    }

    #[test]
    fn posts_json_with_bearer_token() {
        let (base, server) = serve_once("200 OK", r#"{"data":{"id":"doc-1","title":"Hello"}}"#);
        let config = ResolvedConfig::new(&base, "ol_api_test").unwrap();
        let transport = HttpTransport::new().unwrap();

        let env = transport.call(&config, documents_info(), &params()).unwrap();
        assert_eq!(env.data()["title"], json!("Hello"));

        let request = server.join().unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /api/documents.info HTTP/1.1"), "{request}");
        assert!(lower.contains("authorization: bearer ol_api_test"), "{request}");
        assert!(lower.contains("content-type: application/json"), "{request}");
        assert!(request.ends_with(r#"{"id":"doc-1"}"#), "{request}");
    }

    #[test]
    fn not_found_over_the_wire() {
        let (base, server) = serve_once("404 Not Found", r#"{"ok":false,"error":"not_found","message":"Resource not found"}"#);
        let config = ResolvedConfig::new(&base, "k").unwrap();
        let err = HttpTransport::new()
            .unwrap()
            .call(&config, documents_info(), &params())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::NotFoundError);
        assert_eq!(err.to_string(), "Resource not found");
        server.join().unwrap();
    }

    #[test]
    fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            thread::sleep(Duration::from_secs(2));
        });
        let config = ResolvedConfig::new(&format!("http://{addr}"), "k")
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let err = HttpTransport::new()
            .unwrap()
            .call(&config, documents_info(), &params())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::TransportError);
        assert!(err.to_string().contains("timed out"), "{err}");
    }

    #[test]
    fn cancelled_transport_sends_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let config = ResolvedConfig::new(&format!("http://{}", listener.local_addr().unwrap()), "k").unwrap();
        let transport = HttpTransport::new().unwrap();
        transport.cancel();

        for _ in 0..2 {
            let err = transport.call(&config, documents_info(), &params()).unwrap_err();
            assert_eq!(err.outcome(), OutcomeCode::TransportError);
            assert_eq!(err.to_string(), "request cancelled");
        }
        assert!(listener.accept().is_err(), "no connection expected");
    }

    #[test]
    fn cancel_interrupts_request_in_flight() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            thread::sleep(Duration::from_secs(5));
        });
        let config = ResolvedConfig::new(&format!("http://{addr}"), "k").unwrap();
        let transport = HttpTransport::new().unwrap();

        let err = thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(Duration::from_millis(200));
                transport.cancel();
            });
            transport.call(&config, documents_info(), &params()).unwrap_err()
        });
        assert_eq!(err.to_string(), "request cancelled");
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let config = ResolvedConfig::new(&format!("http://{addr}"), "k").unwrap();
        let err = HttpTransport::new()
            .unwrap()
            .call(&config, documents_info(), &params())
            .unwrap_err();
        assert_eq!(err.outcome(), OutcomeCode::TransportError);
    }
}
