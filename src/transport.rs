//! The HTTP execution seam.
//!
//! [`ApiService`](crate::ApiService) describes each call as a
//! [`TransportRequest`] and hands it to an [`ApiTransport`]. The transport
//! owns the connection pool, the host and any timeout policy; the service
//! only ever sees URLs relative to that host.

use crate::{Error, Result};
use http::{HeaderMap, Method, StatusCode};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A request described as plain data.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The HTTP verb.
    pub method: Method,
    /// URL relative to the transport host, as built by [`crate::uri::build_uri`].
    pub url: String,
    /// Headers to send, client defaults included.
    pub headers: HeaderMap,
    /// Serialized JSON payload.
    pub body: Option<String>,
}

/// A response described as plain data.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body as text. Empty when the server sent none.
    pub body: String,
}

/// Executes requests on behalf of an [`ApiService`](crate::ApiService).
///
/// Implementations are shared across concurrent calls and must not keep
/// per-call state. A response with a non-2xx status is still `Ok`: status
/// classification belongs to the service. `Err` is reserved for exchanges
/// that did not complete, reported as [`Error::Network`],
/// [`Error::BodyRead`], [`Error::InvalidUrl`] or [`Error::Timeout`].
pub trait ApiTransport: Send + Sync {
    /// Sends `request` and waits for the full response body.
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

impl<T: ApiTransport> ApiTransport for Arc<T> {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send {
        (**self).send(request)
    }
}

/// [`ApiTransport`] backed by a caller-owned [`reqwest::Client`].
///
/// # Examples
///
/// ```no_run
/// use apiservice::ReqwestTransport;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), apiservice::Error> {
/// let http = reqwest::Client::new();
/// let transport = ReqwestTransport::new(http, "https://api.example.com")?
///     .with_timeout(Duration::from_secs(30));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    host: Url,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Wraps `client`, resolving relative request URLs against `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an absolute URL.
    pub fn new(client: reqwest::Client, host: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            client,
            host: Url::parse(host.as_ref())?,
            timeout: None,
        })
    }

    /// Creates a transport with its own default `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is invalid or the client cannot be built.
    pub fn from_host(host: impl AsRef<str>) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;
        Self::new(client, host)
    }

    /// Sets a timeout applied to every request sent through this transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The host relative URLs are resolved against.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Resolves a request URL. Absolute URLs pass through; relative ones are
    /// appended to the host, keeping any path prefix the host carries.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let host = self.host.as_str().trim_end_matches('/');
                let separator = if url.starts_with('/') { "" } else { "/" };
                Ok(Url::parse(&format!("{}{}{}", host, separator, url))?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ApiTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = self.resolve(&request.url)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::BodyRead { status, source: e }
            }
        })?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(host: &str) -> ReqwestTransport {
        ReqwestTransport::new(reqwest::Client::new(), host).unwrap()
    }

    #[test]
    fn test_resolve_relative() {
        let t = transport("https://api.example.com");
        assert_eq!(
            t.resolve("/people/1").unwrap().as_str(),
            "https://api.example.com/people/1"
        );
        assert_eq!(
            t.resolve("/people?q=1").unwrap().as_str(),
            "https://api.example.com/people?q=1"
        );
    }

    #[test]
    fn test_resolve_keeps_host_prefix() {
        let t = transport("https://api.example.com/v1/");
        assert_eq!(
            t.resolve("/people").unwrap().as_str(),
            "https://api.example.com/v1/people"
        );
        assert_eq!(
            t.resolve("people").unwrap().as_str(),
            "https://api.example.com/v1/people"
        );
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let t = transport("https://api.example.com");
        assert_eq!(
            t.resolve("http://other.example.com/x").unwrap().as_str(),
            "http://other.example.com/x"
        );
    }

    #[test]
    fn test_relative_host_rejected() {
        let result = ReqwestTransport::new(reqwest::Client::new(), "/people");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
