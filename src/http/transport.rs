//! HTTP transport boundary.
//!
//! # Data Flow
//! ```text
//! Transport::perform(url, sink)
//!     → sink.on_header(status line)
//!     → sink.on_header(each "name: value" line, in receipt order)
//!     → sink.on_header(blank terminator)
//!     → sink.on_body(chunk) ... (in order, any chunking)
//! ```
//!
//! # Design Decisions
//! - The transport owns connection, TLS and proxies
//! - Redirects are never followed: a 3xx response is the response
//! - No request verb crosses this boundary: every launch issues a GET
//! - Header values are forwarded as raw bytes, never re-encoded
//! - libcurl is the default backend: its header callback sees every line as
//!   it came off the wire. The reqwest backend rebuilds lines from a parsed
//!   `HeaderMap`, so names arrive lowercased

use std::future::Future;
use std::time::Duration;

use curl::easy::Easy;
use tokio::sync::mpsc;
use url::Url;

use crate::config::{TransportBackend, TransportConfig};
use crate::error::{ArgumentError, FetchError};

/// Receives the raw pieces of a response as the transport delivers them.
pub trait ResponseSink: Send {
    /// Called once per raw header line, including status line and terminator.
    fn on_header(&mut self, line: &[u8]);

    /// Called with body bytes in order; may be called any number of times.
    fn on_body(&mut self, chunk: &[u8]);
}

/// Performs exactly one HTTP round trip.
pub trait Transport: Send + Sync {
    fn perform(
        &self,
        url: &str,
        sink: &mut dyn ResponseSink,
    ) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// Add `default_scheme://` to URLs typed without a scheme and validate them.
pub fn normalize_url(raw: &str, default_scheme: &str) -> Result<String, ArgumentError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("{}://{}", default_scheme, raw)
    };

    Url::parse(&candidate)
        .map(String::from)
        .map_err(|e| ArgumentError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Transport selected by `transport.backend`.
#[derive(Debug, Clone)]
pub enum HttpTransport {
    Curl(CurlTransport),
    Reqwest(ReqwestTransport),
}

impl HttpTransport {
    pub fn from_config(config: &TransportConfig) -> Result<Self, FetchError> {
        match config.backend {
            TransportBackend::Curl => Ok(Self::Curl(CurlTransport::new(config))),
            TransportBackend::Reqwest => Ok(Self::Reqwest(ReqwestTransport::new(config)?)),
        }
    }
}

impl Transport for HttpTransport {
    async fn perform(&self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), FetchError> {
        match self {
            Self::Curl(transport) => transport.perform(url, sink).await,
            Self::Reqwest(transport) => transport.perform(url, sink).await,
        }
    }
}

/// What the blocking libcurl callbacks hand back to the async side.
#[derive(Debug)]
enum CurlEvent {
    Header(Vec<u8>),
    Body(Vec<u8>),
}

/// Transport backed by libcurl.
///
/// The transfer runs on the blocking pool; callbacks forward raw header lines
/// and body chunks over a channel, so the sink still sees them in order.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
    timeout: Option<Duration>,
}

impl CurlTransport {
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn curl_round_trip(
    url: &str,
    user_agent: &str,
    timeout: Option<Duration>,
    events: mpsc::UnboundedSender<CurlEvent>,
) -> Result<(), curl::Error> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.useragent(user_agent)?;
    easy.follow_location(false)?;
    if let Some(timeout) = timeout {
        easy.timeout(timeout)?;
    }

    let header_events = events.clone();
    let mut transfer = easy.transfer();
    // A closed channel means the launch went away; returning short aborts.
    transfer.header_function(move |line| {
        header_events
            .send(CurlEvent::Header(line.to_vec()))
            .is_ok()
    })?;
    transfer.write_function(move |data| match events.send(CurlEvent::Body(data.to_vec())) {
        Ok(()) => Ok(data.len()),
        Err(_) => Ok(0),
    })?;
    transfer.perform()
}

impl Transport for CurlTransport {
    async fn perform(&self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), FetchError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let url = url.to_string();
        let user_agent = self.user_agent.clone();
        let timeout = self.timeout;

        let handle = tokio::task::spawn_blocking(move || {
            curl_round_trip(&url, &user_agent, timeout, tx)
        });

        while let Some(event) = rx.recv().await {
            match event {
                CurlEvent::Header(line) => sink.on_header(&line),
                CurlEvent::Body(chunk) => {
                    tracing::trace!(len = chunk.len(), "Body chunk received");
                    sink.on_body(&chunk);
                }
            }
        }

        handle.await??;
        Ok(())
    }
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn perform(&self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), FetchError> {
        let mut response = self.client.get(url).send().await?;

        let status_line = format!("{:?} {}\r\n", response.version(), response.status());
        sink.on_header(status_line.as_bytes());

        for (name, value) in response.headers() {
            let mut line = Vec::with_capacity(name.as_str().len() + value.len() + 4);
            line.extend_from_slice(name.as_str().as_bytes());
            line.extend_from_slice(b": ");
            line.extend_from_slice(value.as_bytes());
            line.extend_from_slice(b"\r\n");
            sink.on_header(&line);
        }
        sink.on_header(b"\r\n");

        while let Some(chunk) = response.chunk().await? {
            tracing::trace!(len = chunk.len(), "Body chunk received");
            sink.on_body(&chunk);
        }

        Ok(())
    }
}
