//! Outcome classification and the typed error every component returns.
//!
//! `OutcomeCode` is the closed set of results an invocation can end in; it
//! drives both the rendered payload and the process exit code. `CliError`
//! carries the message for every non-success outcome.

use serde::Serialize;
use thiserror::Error;

/// Final classification of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCode {
    Success,
    ConfigError,
    ValidationError,
    AuthError,
    NotFoundError,
    PermissionError,
    RateLimitError,
    TransportError,
    UnknownApiError,
}

impl OutcomeCode {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            OutcomeCode::Success => 0,
            OutcomeCode::ConfigError | OutcomeCode::ValidationError => 2,
            OutcomeCode::AuthError | OutcomeCode::PermissionError => 3,
            OutcomeCode::NotFoundError => 4,
            OutcomeCode::RateLimitError => 5,
            OutcomeCode::TransportError | OutcomeCode::UnknownApiError => 6,
        }
    }

    /// Stable snake_case name, identical to the JSON `outcome` field.
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeCode::Success => "success",
            OutcomeCode::ConfigError => "config_error",
            OutcomeCode::ValidationError => "validation_error",
            OutcomeCode::AuthError => "auth_error",
            OutcomeCode::NotFoundError => "not_found_error",
            OutcomeCode::PermissionError => "permission_error",
            OutcomeCode::RateLimitError => "rate_limit_error",
            OutcomeCode::TransportError => "transport_error",
            OutcomeCode::UnknownApiError => "unknown_api_error",
        }
    }
}

impl std::fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failure. Each variant maps to exactly one `OutcomeCode`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or invalid credentials / base URL.
    #[error("{0}")]
    Config(String),

    /// Bad CLI input, caught before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    RateLimited(String),

    /// Connectivity, timeout, cancellation or pagination non-termination.
    #[error("{0}")]
    Transport(String),

    /// Remote failure that matches no known class; message kept verbatim.
    #[error("{message}")]
    UnknownApi {
        status: Option<u16>,
        message: String,
    },

    /// A failure raised while fetching page `page` of an `--all` request.
    #[error("page {page}: {source}")]
    Page {
        page: usize,
        #[source]
        source: Box<CliError>,
    },
}

impl CliError {
    pub fn unknown_api(status: Option<u16>, message: impl Into<String>) -> Self {
        CliError::UnknownApi {
            status,
            message: message.into(),
        }
    }

    /// Attach the index of the failing page, keeping the error kind.
    pub fn on_page(self, page: usize) -> Self {
        match self {
            CliError::Page { .. } => self,
            other => CliError::Page {
                page,
                source: Box::new(other),
            },
        }
    }

    pub fn outcome(&self) -> OutcomeCode {
        match self {
            CliError::Config(_) => OutcomeCode::ConfigError,
            CliError::Validation(_) => OutcomeCode::ValidationError,
            CliError::Auth(_) => OutcomeCode::AuthError,
            CliError::NotFound(_) => OutcomeCode::NotFoundError,
            CliError::Permission(_) => OutcomeCode::PermissionError,
            CliError::RateLimited(_) => OutcomeCode::RateLimitError,
            CliError::Transport(_) => OutcomeCode::TransportError,
            CliError::UnknownApi { .. } => OutcomeCode::UnknownApiError,
            CliError::Page { source, .. } => source.outcome(),
        }
    }

    /// Message without the page prefix.
    pub fn message(&self) -> String {
        match self {
            CliError::Page { source, .. } => source.message(),
            other => other.to_string(),
        }
    }

    /// HTTP status reported by the remote service, when known.
    pub fn status(&self) -> Option<u16> {
        match self {
            CliError::UnknownApi { status, .. } => *status,
            CliError::Page { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn page(&self) -> Option<usize> {
        match self {
            CliError::Page { page, .. } => Some(*page),
            _ => None,
        }
    }
}
