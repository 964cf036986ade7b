//! # fridge-adapter-http-reqwest
//!
//! [`HttpClient`] port implementation on top of [`reqwest`].
//!
//! The client carries the transport timeout; an elapsed timeout surfaces as
//! [`NetworkError::Timeout`], every other transport failure as
//! [`NetworkError::Transport`]. Status codes are passed through untouched so
//! the application layer decides what counts as success.
//!
//! ## Dependency rule
//!
//! Depends on `fridge-app` (port traits) only.

use std::future::Future;
use std::time::Duration;

use fridge_app::ports::{HttpClient, HttpResponse, NetworkError};

/// Default transport timeout for lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("fridge/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building the client.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The TLS backend or client configuration could not be initialised.
    #[error("failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}

/// `reqwest`-backed HTTP client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

fn map_error(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else {
        NetworkError::Transport(Box::new(err))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send {
        let request = self.client.get(url);
        async move {
            let response = request.send().await.map_err(map_error)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(map_error)?;
            tracing::debug!(status, size = body.len(), "lookup response received");
            Ok(HttpResponse {
                status,
                body: body.to_vec(),
            })
        }
    }
}
