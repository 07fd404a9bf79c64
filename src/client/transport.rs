//! The HTTP transport seam consumed by the retrieval client.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;

use crate::client::ClientSettings;
use crate::error::{ConfigError, Result};

/// A received HTTP response, whatever its status.
#[derive(Debug, Clone)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Transport-level failure: no response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connect or read timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other transport failure (e.g. the connection dropped mid-body).
    #[error("transport failure: {0}")]
    Other(String),
}

/// Trait for issuing one GET request against a candidate endpoint.
///
/// A received response of any status is `Ok`; `Err` means no response was
/// received at all. The retrieval client classifies both.
#[async_trait]
pub trait EnvironmentTransport: Send + Sync {
    /// Issue one GET request.
    async fn get(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> std::result::Result<TransportReply, TransportError>;
}

/// [`EnvironmentTransport`] backed by a shared [`reqwest::Client`].
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from client settings.
    ///
    /// Timeouts were validated when the settings were built; a zero timeout
    /// disables the corresponding limit.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if !settings.timeout.is_zero() {
            builder = builder.timeout(settings.timeout);
        }
        if !settings.connect_timeout.is_zero() {
            builder = builder.connect_timeout(settings.connect_timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EnvironmentTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> std::result::Result<TransportReply, TransportError> {
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(classify_send_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(TransportReply { status, body })
    }
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
