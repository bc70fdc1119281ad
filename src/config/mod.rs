//! Credential / base URL resolution.
//!
//! resolve() -> ResolvedConfig { base_url, api_key, timeout }
//!
//! Precedence is per field: environment variable, then `~/.outline-cli.yml`,
//! then absence (a ConfigError naming what is missing). No network I/O.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::error::CliError;

pub const BASE_URL_VAR: &str = "OUTLINE_BASE_URL";
pub const API_KEY_VAR: &str = "OUTLINE_API_KEY";
pub const TIMEOUT_VAR: &str = "OUTLINE_TIMEOUT";

/// File name looked up in the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".outline-cli.yml";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Self {
        ApiKey(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Fully resolved connection settings. Read-only after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: Url,
    pub api_key: ApiKey,
    pub timeout: Duration,
}

impl ResolvedConfig {
    /// Validate and normalise a base URL / key pair.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, CliError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CliError::Config("API key is empty".into()));
        }
        Ok(ResolvedConfig {
            base_url: normalize_base_url(base_url)?,
            api_key: ApiKey::new(api_key),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL of an operation path such as `/documents.list`.
    pub fn endpoint(&self, path: &str) -> Result<Url, CliError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| CliError::Config(format!("invalid endpoint URL '{joined}': {e}")))
    }
}

/// Trim, drop trailing slashes and make sure the path ends in `/api`.
pub fn normalize_base_url(raw: &str) -> Result<Url, CliError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CliError::Config("base URL is empty".into()));
    }
    let with_api = if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api")
    };
    let url = Url::parse(&with_api)
        .map_err(|e| CliError::Config(format!("invalid base URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CliError::Config(format!(
            "invalid base URL '{raw}': unsupported scheme '{other}' (expected http or https)"
        ))),
    }
}

/// Keys read from the YAML config file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<u64>,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Merges the environment and the config file into a `ResolvedConfig`.
pub struct ConfigResolver {
    env: EnvLookup,
    file: Option<PathBuf>,
}

impl ConfigResolver {
    /// Resolver over the real process environment and `~/.outline-cli.yml`.
    pub fn from_process() -> Self {
        ConfigResolver {
            env: Box::new(|key| std::env::var(key).ok()),
            file: default_config_path(),
        }
    }

    /// Resolver over an arbitrary environment lookup and optional file.
    pub fn new(env: impl Fn(&str) -> Option<String> + 'static, file: Option<PathBuf>) -> Self {
        ConfigResolver {
            env: Box::new(env),
            file,
        }
    }

    /// Resolver over a fixed set of variables and no config file.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        ConfigResolver::new(move |key| map.get(key).cloned(), None)
    }

    pub fn resolve(&self) -> Result<ResolvedConfig, CliError> {
        let base_url = self.var(BASE_URL_VAR);
        let api_key = self.var(API_KEY_VAR);
        let timeout = self.var(TIMEOUT_VAR);

        // The file is only consulted for fields the environment leaves unset.
        // When it can only supply the timeout, a broken file is not fatal.
        let file = match &self.file {
            Some(path) if base_url.is_none() || api_key.is_none() => {
                load_file(path).map_err(|e| CliError::Config(format!("{e:#}")))?
            }
            Some(path) if timeout.is_none() => load_file(path).unwrap_or_else(|e| {
                tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable config file");
                FileConfig::default()
            }),
            _ => FileConfig::default(),
        };

        let base_url = base_url.or_else(|| non_empty(file.base_url));
        let api_key = api_key.or_else(|| non_empty(file.api_key));

        let mut missing = Vec::new();
        if base_url.is_none() {
            missing.push((BASE_URL_VAR, "base_url"));
        }
        if api_key.is_none() {
            missing.push((API_KEY_VAR, "api_key"));
        }
        let (Some(base_url), Some(api_key)) = (base_url, api_key) else {
            return Err(CliError::Config(missing_message(&missing)));
        };

        let timeout = match timeout {
            Some(raw) => parse_timeout(&raw)?,
            None => file
                .timeout
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        let config = ResolvedConfig::new(&base_url, &api_key)?.with_timeout(timeout);
        tracing::debug!(base_url = %config.base_url, timeout_secs = timeout.as_secs(), "configuration resolved");
        Ok(config)
    }

    fn var(&self, key: &str) -> Option<String> {
        non_empty((self.env)(key))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

fn load_file(path: &Path) -> anyhow::Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let parsed: Option<FileConfig> = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(parsed.unwrap_or_default())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration, CliError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(CliError::Config(format!(
            "invalid {TIMEOUT_VAR} '{raw}': expected a positive number of seconds"
        ))),
    }
}

fn missing_message(missing: &[(&str, &str)]) -> String {
    let vars: Vec<&str> = missing.iter().map(|(var, _)| *var).collect();
    let keys: Vec<String> = missing.iter().map(|(_, key)| format!("'{key}'")).collect();
    format!(
        "missing {}: set the {} environment variable{} or add {} to ~/{CONFIG_FILE_NAME}",
        vars.join(" and "),
        vars.join(" / "),
        if vars.len() > 1 { "s" } else { "" },
        keys.join(" and "),
    )
}
