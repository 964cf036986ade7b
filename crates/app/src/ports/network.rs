//! Network port — plain HTTP GET for the barcode lookup service.

use std::future::Future;
use std::sync::Arc;

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the `2xx` range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Connection, TLS, or body read failure.
    #[error("request failed")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transport timeout elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Issues HTTP GET requests. No other verb is used by the core.
pub trait HttpClient {
    /// Fetch `url` and return its status and body without interpreting them.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send;
}

impl<T: HttpClient + Send + Sync> HttpClient for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send {
        (**self).get(url)
    }
}
