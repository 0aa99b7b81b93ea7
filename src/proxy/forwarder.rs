//! Origin Forwarder
//!
//! Rewrites an inbound request onto the origin, executes it over a shared
//! connection pool and classifies transport failures.

use std::time::Duration;

use axum::body::{Body, HttpBody};
use axum::http::{header, HeaderMap, Method, StatusCode};
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Response headers that describe the origin connection rather than the
/// resource. The body is fully buffered and re-framed, so these are dropped.
const FRAMING_HEADERS: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

// == Forward Error ==
/// Classified outcome of a failed origin round trip.
#[derive(Error, Debug)]
pub enum ForwardError {
    /// The outbound request could not be built
    #[error("failed to create request to origin: {0}")]
    RequestBuild(String),

    /// The origin could not be reached or did not answer in time
    #[error("failed to reach origin: {message}")]
    Network { message: String, timeout: bool },

    /// A response arrived but its body could not be read in full
    #[error("failed to read origin response: {0}")]
    ResponseRead(String),
}

impl From<ForwardError> for ProxyError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::RequestBuild(msg) => ProxyError::internal(
                "REQUEST_CREATION_FAILED",
                format!("Failed to create request to origin server: {}", msg),
            ),
            ForwardError::Network {
                message,
                timeout: true,
            } => ProxyError::network(
                "ORIGIN_TIMEOUT",
                format!("Origin server did not respond in time: {}", message),
            ),
            ForwardError::Network { message, .. } => ProxyError::network(
                "ORIGIN_REQUEST_FAILED",
                format!("Failed to reach origin server: {}", message),
            ),
            ForwardError::ResponseRead(msg) => ProxyError::network(
                "ORIGIN_RESPONSE_READ_FAILED",
                format!("Failed to read response from origin server: {}", msg),
            ),
        }
    }
}

// == Origin Response ==
/// A fully-read origin response.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// == Origin Forwarder ==
/// Forwards requests to a single origin.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OriginForwarder {
    client: Client,
    origin: Url,
    timeout: Duration,
}

impl OriginForwarder {
    /// Builds a forwarder with its own connection pool.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .no_proxy()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                ProxyError::internal(
                    "HTTP_CLIENT_INIT_FAILED",
                    format!("Failed to build origin client: {}", e),
                )
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Builds a forwarder over an existing client.
    pub fn with_client(client: Client, config: &ProxyConfig) -> Self {
        Self {
            client,
            origin: config.origin.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    // == Target URL ==
    /// Rewrites the origin URL with the inbound path and query, verbatim.
    ///
    /// The cache key is derived from the raw inbound path, so a path the URL
    /// parser would rewrite (dot-segments, characters it percent-encodes) is
    /// rejected rather than sent as a different resource.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Result<Url, ForwardError> {
        if !path.starts_with('/') {
            return Err(ForwardError::RequestBuild(format!(
                "path must be absolute, got '{}'",
                path
            )));
        }

        let mut url = self.origin.clone();
        url.set_path(path);
        if url.path() != path {
            return Err(ForwardError::RequestBuild(format!(
                "path '{}' is not in normalized form (would be sent as '{}')",
                path,
                url.path()
            )));
        }
        url.set_query(query);
        Ok(url)
    }

    // == Fetch ==
    /// Sends the request to the origin and reads the full response.
    ///
    /// Every inbound header is copied except `Host`, which is derived from
    /// the origin URL. The inbound body is streamed through unmodified. The
    /// configured timeout covers connect, headers and body transfer.
    pub async fn fetch(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        body: Body,
    ) -> Result<OriginResponse, ForwardError> {
        let url = self.target_url(path, query)?;

        let mut outbound = headers.clone();
        outbound.remove(header::HOST);

        let mut builder = self
            .client
            .request(method, url)
            .headers(outbound)
            .timeout(self.timeout);

        if body.size_hint().exact() != Some(0) {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let request = builder
            .build()
            .map_err(|e| ForwardError::RequestBuild(e.to_string()))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Forwarding request to origin");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let mut headers = response.headers().clone();
        for name in FRAMING_HEADERS {
            headers.remove(name);
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ForwardError::Network {
                    message: e.to_string(),
                    timeout: true,
                }
            } else {
                ForwardError::ResponseRead(e.to_string())
            }
        })?;

        debug!(%method, %url, %status, bytes = body.len(), "Received origin response");

        Ok(OriginResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify_send_error(err: reqwest::Error) -> ForwardError {
    if err.is_builder() {
        return ForwardError::RequestBuild(err.to_string());
    }
    ForwardError::Network {
        timeout: err.is_timeout(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarder(origin: &str) -> OriginForwarder {
        OriginForwarder::new(&ProxyConfig {
            origin: Url::parse(origin).unwrap(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_target_url_replaces_path_and_query() {
        let fwd = forwarder("http://origin.example:8080/ignored");

        let url = fwd.target_url("/products", Some("page=2&sort=asc")).unwrap();
        assert_eq!(url.as_str(), "http://origin.example:8080/products?page=2&sort=asc");
    }

    #[test]
    fn test_target_url_without_query() {
        let fwd = forwarder("https://origin.example");

        let url = fwd.target_url("/a/b", None).unwrap();
        assert_eq!(url.as_str(), "https://origin.example/a/b");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_target_url_rejects_relative_path() {
        let fwd = forwarder("http://origin.example");
        assert!(matches!(
            fwd.target_url("relative", None),
            Err(ForwardError::RequestBuild(_))
        ));
    }

    #[test]
    fn test_target_url_rejects_dot_segments() {
        let fwd = forwarder("http://origin.example");

        for path in ["/a/../b", "/a/%2e%2e/b", "/a/./b", "/a/%2E/b"] {
            assert!(
                matches!(fwd.target_url(path, None), Err(ForwardError::RequestBuild(_))),
                "path {} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_target_url_rejects_path_needing_encoding() {
        let fwd = forwarder("http://origin.example");
        assert!(matches!(
            fwd.target_url("/a b", None),
            Err(ForwardError::RequestBuild(_))
        ));
    }

    #[test]
    fn test_target_url_keeps_encoded_path_verbatim() {
        let fwd = forwarder("http://origin.example");

        let url = fwd.target_url("/files/a%20b/%2Fx", Some("q=%41")).unwrap();
        assert_eq!(url.path(), "/files/a%20b/%2Fx");
        assert_eq!(url.query(), Some("q=%41"));
    }

    #[test]
    fn test_forward_error_classification() {
        let err: ProxyError = ForwardError::RequestBuild("bad".into()).into();
        assert_eq!(err.code(), "REQUEST_CREATION_FAILED");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ProxyError = ForwardError::Network {
            message: "refused".into(),
            timeout: false,
        }
        .into();
        assert_eq!(err.code(), "ORIGIN_REQUEST_FAILED");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err: ProxyError = ForwardError::Network {
            message: "slow".into(),
            timeout: true,
        }
        .into();
        assert_eq!(err.code(), "ORIGIN_TIMEOUT");

        let err: ProxyError = ForwardError::ResponseRead("truncated".into()).into();
        assert_eq!(err.code(), "ORIGIN_RESPONSE_READ_FAILED");
    }
}
