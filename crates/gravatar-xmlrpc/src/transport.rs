//! HTTP transport for XML-RPC documents.

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Moves a serialized request to the server and returns the response body.
///
/// Implemented by [`HttpTransport`]; tests substitute an in-memory transport.
pub trait Transport: Send + Sync {
    /// POSTs `body` to `url` and returns the response body.
    fn post(&self, url: &Url, body: String) -> impl Future<Output = Result<String>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the given timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { http_client })
    }
}

impl Transport for HttpTransport {
    async fn post(&self, url: &Url, body: String) -> Result<String> {
        let response = self
            .http_client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_creation() {
        assert!(HttpTransport::new(DEFAULT_TIMEOUT, "test-agent/1.0").is_ok());
    }
}
