use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Path of the tunnel endpoint on the LNK module.
pub const STICK_PATH: &str = "/stick";

/// User agent the stock mobile app sends. Some firmware rejects anything else.
pub const DEFAULT_USER_AGENT: &str = "RainBird/2.0 CFNetwork/811.5.4 Darwin/16.7.0";

/// Default overall request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Build the tunnel URL for a controller address (`host` or `host:port`).
pub fn stick_url(address: &str) -> String {
    format!("http://{}{STICK_PATH}", address.trim_end_matches('/'))
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Overall timeout for one exchange. `None` disables it.
    pub timeout: Option<Duration>,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Blocking HTTP transport backed by `reqwest::blocking`.
///
/// Must not be created or dropped inside an async runtime; use
/// `AsyncHttpTransport` there.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        // The blocking builder applies its own 30s timeout unless told otherwise.
        let client = reqwest::blocking::Client::builder()
            .default_headers(default_headers())
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn exchange(&self, address: &str, body: Bytes) -> Result<Bytes> {
        let url = stick_url(address);
        debug!(%url, size = body.len(), "posting request");

        let response = self
            .client
            .post(&url)
            .body(body)
            .send()
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        check_status(&url, response.status())?;

        let reply = response
            .bytes()
            .map_err(|source| TransportError::Body { url: url.clone(), source })?;
        debug!(%url, size = reply.len(), "received reply");
        Ok(reply)
    }
}

/// Asynchronous HTTP transport backed by `reqwest::Client`.
#[cfg(feature = "async")]
#[derive(Debug, Clone)]
pub struct AsyncHttpTransport {
    client: reqwest::Client,
}

#[cfg(feature = "async")]
impl AsyncHttpTransport {
    /// Create a transport with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers())
            .user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

#[cfg(feature = "async")]
impl crate::traits::AsyncTransport for AsyncHttpTransport {
    async fn exchange(&self, address: &str, body: Bytes) -> Result<Bytes> {
        let url = stick_url(address);
        debug!(%url, size = body.len(), "posting request");

        let response = self
            .client
            .post(&url)
            .body(body)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        check_status(&url, response.status())?;

        let reply = response
            .bytes()
            .await
            .map_err(|source| TransportError::Body { url: url.clone(), source })?;
        debug!(%url, size = reply.len(), "received reply");
        Ok(reply)
    }
}

fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        return Ok(());
    }
    warn!(%url, status = status.as_u16(), "controller rejected request");
    Err(TransportError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("unknown").to_string(),
    })
}
