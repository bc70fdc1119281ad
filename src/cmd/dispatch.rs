//! One invocation, start to exit code.
//!
//! config -> operation -> bound request -> (paginated) call -> rendered payload
//!
//! Any failure skips straight to rendering. Exactly one payload is written per
//! run, success or not.

use std::io::Write;

use super::bind::{PageRequest, RawArgs, bind};
use super::catalog::Catalog;
use super::format::StyleOptions;
use super::paginate::Paginator;
use super::render::{render_failure, render_success};
use super::OutputFormat;
use crate::api::{ResultEnvelope, Transport};
use crate::config::ConfigResolver;
use crate::error::{CliError, OutcomeCode};

pub struct Dispatcher<'c, T> {
    catalog: &'c Catalog,
    resolver: ConfigResolver,
    transport: T,
    paginator: Paginator,
    style: StyleOptions,
}

impl<'c, T: Transport> Dispatcher<'c, T> {
    pub fn new(catalog: &'c Catalog, resolver: ConfigResolver, transport: T) -> Self {
        Dispatcher {
            catalog,
            resolver,
            transport,
            paginator: Paginator::default(),
            style: StyleOptions::detect(),
        }
    }

    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the invocation up to, but not including, rendering.
    pub fn execute(
        &self,
        group: &str,
        name: &str,
        raw: &RawArgs,
    ) -> Result<(ResultEnvelope, OutputFormat), CliError> {
        let config = self.resolver.resolve()?;
        let op = self.catalog.lookup(group, name)?;
        let request = bind(op, raw)?;
        tracing::info!(
            operation = %op,
            path = op.path,
            mutating = op.method.is_mutating(),
            "dispatching"
        );

        let envelope = match request.pagination {
            Some(PageRequest::All) => {
                self.paginator
                    .fetch_all(&self.transport, &config, op, &request.params)?
            }
            _ => self.transport.call(&config, op, &request.payload())?,
        };
        Ok((envelope, request.format))
    }

    /// Execute, render, write one payload to `out` and return the outcome.
    pub fn run(&self, group: &str, name: &str, raw: &RawArgs, out: &mut impl Write) -> OutcomeCode {
        let (text, outcome) = match self.execute(group, name, raw) {
            Ok((envelope, format)) => {
                tracing::debug!(group, name, "invocation succeeded");
                (render_success(&envelope, format, &self.style), OutcomeCode::Success)
            }
            Err(err) => {
                tracing::info!(outcome = %err.outcome(), error = %err, "invocation failed");
                let format = raw.requested_format().unwrap_or_default();
                (render_failure(&err, format, &self.style), err.outcome())
            }
        };

        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            // Closed pipe and the like: nothing left to report to.
            tracing::error!(error = %e, "failed to write output");
            if outcome == OutcomeCode::Success {
                return OutcomeCode::TransportError;
            }
        }
        outcome
    }
}
