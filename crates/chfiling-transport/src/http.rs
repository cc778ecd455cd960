use std::time::Duration;

use bytes::Bytes;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Configuration for the blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total time allowed for one exchange (connect, send, receive).
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: format!("chfiling/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Posts envelopes to the gateway endpoint as `text/xml`.
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for `url` with default configuration.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_config(url, HttpConfig::default())
    }

    /// Create a transport for `url` with explicit configuration.
    pub fn with_config(url: impl Into<String>, config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Gateway endpoint this transport posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: Bytes) -> Result<Bytes> {
        debug!(url = %self.url, size = request.len(), "posting envelope");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/xml")
            .body(request)
            .send()
            .map_err(|err| map_reqwest_error(&self.url, err))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|err| map_reqwest_error(&self.url, err))?;
        info!(url = %self.url, size = body.len(), "gateway responded");
        Ok(body)
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(cause) = tls_failure(&err) {
        TransportError::Tls {
            url: url.to_string(),
            message: cause,
        }
    } else if err.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Message of the first error below `err` raised by the TLS layer.
///
/// rustls and the certificate verifier surface through hyper as opaque
/// boxed errors, so the chain is matched on its messages. The outer error
/// is skipped because it embeds the request URL.
fn tls_failure(err: &(dyn std::error::Error + 'static)) -> Option<String> {
    const MARKERS: [&str; 4] = ["certificate", "tls", "ssl", "handshake"];

    let mut current = err.source();
    while let Some(cause) = current {
        let message = cause.to_string();
        let lowered = message.to_ascii_lowercase();
        if MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return Some(message);
        }
        current = cause.source();
    }
    None
}
