//! Command-line access to the Outline wiki API.
//!
//! Every remote capability is one entry in a static catalog; a single
//! dispatcher resolves configuration, binds flags, calls the API (walking
//! pages for `--all`) and renders exactly one JSON or table payload.

pub mod api;
pub mod cmd;
pub mod config;
pub mod error;
pub mod utils;

pub use error::{CliError, OutcomeCode};
