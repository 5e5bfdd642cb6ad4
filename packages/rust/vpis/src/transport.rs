//! HTTP transport seam.
//!
//! The fetcher only needs "GET this URL, tell me status, content type,
//! where the redirects ended, and the body". Production code uses
//! [`ReqwestTransport`]; tests plug in fakes.

use std::future::Future;
use std::time::Duration;

use occupancy_shared::{OccupancyError, Result, VpisConfig};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

/// User-Agent string for VPIS requests.
const USER_AGENT: &str = concat!("occupancy/", env!("CARGO_PKG_VERSION"));

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Effective URL after following redirects.
    pub final_url: Url,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issues GET requests.
///
/// Only connection-level failures are errors here; a non-success status
/// is returned as a normal [`RawResponse`] for the caller to classify.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client with the configured timeout and redirect limit.
    pub fn new(config: &VpisConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                OccupancyError::network(
                    &config.base_url,
                    format!("failed to build HTTP client: {e}"),
                )
            })?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| OccupancyError::network(url.as_str(), e.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                OccupancyError::network(url.as_str(), format!("failed to read body: {e}"))
            })?
            .to_vec();

        debug!(status, %final_url, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            content_type,
            final_url,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_final_url_after_redirect() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::path("/start"))
            .respond_with(
                wiremock::ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/end", server.uri()).as_str()),
            )
            .mount(&server)
            .await;

        wiremock::Mock::given(wiremock::matchers::path("/end"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw("<ok/>", "application/xml"),
            )
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&VpisConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/start", server.uri())).unwrap();
        let response = transport.get(&url).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.final_url.path(), "/end");
        assert_eq!(response.content_type.as_deref(), Some("application/xml"));
        assert_eq!(response.text(), "<ok/>");
    }

    #[tokio::test]
    async fn non_success_is_not_a_transport_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&VpisConfig::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let response = transport.get(&url).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }
}
