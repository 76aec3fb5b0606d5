//! Launch sequence for a single request.
//!
//! # State Machine
//! ```text
//! Idle → HeadersReceiving → BodyReceiving → Decoding → Done
//!   └──────────┴─────────────────┴─────────────┴──→ Failed
//! ```
//!
//! # Responsibilities
//! - Give every launch a fresh header store and body buffer
//! - Wire both into the transport as sinks
//! - Decode once the transport is done and print the results

use std::fmt;
use std::io::Write;

use crate::config::RequestConfig;
use crate::error::FetchError;
use crate::http::decoder::{DecodedResponse, ResponseDecoder};
use crate::http::headers::{HeaderLine, HeaderStore};
use crate::http::transport::{ResponseSink, Transport};

/// Lifecycle of one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    HeadersReceiving,
    BodyReceiving,
    Decoding,
    Done,
    Failed,
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchState::Idle => write!(f, "Idle"),
            LaunchState::HeadersReceiving => write!(f, "HeadersReceiving"),
            LaunchState::BodyReceiving => write!(f, "BodyReceiving"),
            LaunchState::Decoding => write!(f, "Decoding"),
            LaunchState::Done => write!(f, "Done"),
            LaunchState::Failed => write!(f, "Failed"),
        }
    }
}

/// Sink handed to the transport: accumulates headers and body.
#[derive(Debug)]
struct Collector {
    state: LaunchState,
    headers: HeaderStore,
    body: Vec<u8>,
    show_header: bool,
    /// Echo lines for `--show-header`, flushed after the transport returns.
    echoed: Vec<String>,
}

impl Collector {
    fn new(show_header: bool) -> Self {
        Self {
            state: LaunchState::Idle,
            headers: HeaderStore::new(),
            body: Vec::new(),
            show_header,
            echoed: Vec::new(),
        }
    }

    fn transition(&mut self, next: LaunchState) {
        tracing::debug!(from = %self.state, to = %next, "Launch state change");
        self.state = next;
    }
}

impl ResponseSink for Collector {
    fn on_header(&mut self, line: &[u8]) {
        if let Some(HeaderLine { name, value }) = self.headers.record(line) {
            if self.show_header {
                self.echoed.push(format!("header >> {}: {}", name, value));
            }
        }
    }

    fn on_body(&mut self, chunk: &[u8]) {
        if self.state == LaunchState::HeadersReceiving {
            self.headers.freeze();
            self.transition(LaunchState::BodyReceiving);
        }
        self.body.extend_from_slice(chunk);
    }
}

/// Result of a completed launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Raw response body as received.
    pub bytes: Vec<u8>,
    pub decoded: DecodedResponse,
}

/// Runs launches against a transport, printing to `out`.
pub struct Launcher<'a, T: Transport, W: Write> {
    transport: &'a T,
    out: W,
}

impl<'a, T: Transport, W: Write> Launcher<'a, T, W> {
    pub fn new(transport: &'a T, out: W) -> Self {
        Self { transport, out }
    }

    /// Give back the output writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Perform one request for `config` and print the diagnostics.
    ///
    /// Prints `content-bytes: N` unconditionally and the decoded text unless
    /// `hide_result` is set. Returns the raw body.
    pub async fn launch(&mut self, config: &RequestConfig) -> Result<LaunchOutcome, FetchError> {
        let mut collector = Collector::new(config.show_header);
        collector.transition(LaunchState::HeadersReceiving);

        if let Some(method) = &config.method {
            tracing::debug!(method = %method, "Method stored but not sent");
        }
        tracing::info!(url = %config.url, "Launching request");

        let result = self.transport.perform(&config.url, &mut collector).await;

        for line in collector.echoed.drain(..) {
            writeln!(self.out, "{}", line)?;
        }

        if let Err(e) = result {
            collector.transition(LaunchState::Failed);
            tracing::error!(url = %config.url, error = %e, "Transport failed");
            return Err(e);
        }

        collector.headers.freeze();
        collector.transition(LaunchState::Decoding);

        let decoder = ResponseDecoder::new(config.verbose);
        let decoded = match decoder.decode(&collector.headers, &collector.body, &mut self.out) {
            Ok(decoded) => decoded,
            Err(e) => {
                collector.transition(LaunchState::Failed);
                tracing::error!(error = %e, "Decoding failed");
                return Err(e);
            }
        };

        writeln!(self.out, "content-bytes: {}", collector.body.len())?;
        if !config.hide_result {
            writeln!(self.out, "{}", decoded.text)?;
        }

        collector.transition(LaunchState::Done);
        tracing::info!(
            bytes = collector.body.len(),
            encoding = %decoded.encoding,
            headers = collector.headers.len(),
            "Launch complete"
        );

        Ok(LaunchOutcome {
            bytes: collector.body,
            decoded,
        })
    }
}
