use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{OutboundBody, OutboundRequest};

/// Why an outbound provider call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed")]
    Connect,
    #[error("provider returned an error status")]
    Http,
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("invalid URL")]
    InvalidUrl,
    #[error("request failed")]
    Request,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::InvalidUrl
        } else if err.is_connect() {
            TransportError::Connect
        } else if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_redirect() {
            TransportError::TooManyRedirects
        } else if err.is_status() {
            TransportError::Http
        } else {
            TransportError::Request
        }
    }
}

/// Performs a described provider call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<(), TransportError>;
}

/// reqwest-backed transport sharing one connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<(), TransportError> {
        let mut builder = self.client.request(request.method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        builder = match &request.body {
            OutboundBody::Form(fields) => builder.form(fields),
            OutboundBody::Json(payload) => builder.json(payload),
        };

        let res = builder.send().await.map_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "Provider request failed");
            TransportError::from(e)
        })?;

        let status = res.status();
        res.error_for_status().map_err(|e| {
            tracing::warn!(url = %request.url, status = %status, "Provider rejected request");
            TransportError::from(e)
        })?;

        tracing::debug!(url = %request.url, status = %status, "Provider accepted request");
        Ok(())
    }
}
