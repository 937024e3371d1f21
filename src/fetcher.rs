//! Public IP lookup over HTTP.

use crate::error::{DdnsError, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("r53-ddns/", env!("CARGO_PKG_VERSION"));

/// Longest body accepted from an echo endpoint. An IPv6 literal is at most 45 bytes.
const MAX_BODY_BYTES: usize = 64;

/// Fetches the caller's public address from an IP echo endpoint.
pub struct IpFetcher {
    client: reqwest::Client,
}

impl IpFetcher {
    /// Create a new fetcher.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DdnsError::ClientConstruction(format!("HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Issue a single GET to `url` and return the trimmed body.
    ///
    /// The timeout covers the whole request, body included. Nothing is retried.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let fetch_err = |message: String| DdnsError::Fetch {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| fetch_err(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status)));
        }

        let too_large = || fetch_err(format!("response body exceeds {} bytes", MAX_BODY_BYTES));
        if response
            .content_length()
            .is_some_and(|len| len > MAX_BODY_BYTES as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| fetch_err(describe(&e)))? {
            body.extend_from_slice(&chunk);
            if body.len() > MAX_BODY_BYTES {
                return Err(too_large());
            }
        }

        let text =
            String::from_utf8(body).map_err(|_| fetch_err("response body is not UTF-8".to_string()))?;
        let ip = text.trim();

        if ip.is_empty() {
            return Err(fetch_err("empty response body".to_string()));
        }

        tracing::debug!("Fetched IP from {}: {}", url, ip);
        Ok(ip.to_string())
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_fetch_trims_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("192.0.2.1\n"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = IpFetcher::new().unwrap();
        let ip = fetcher.fetch(&mock_server.uri(), TIMEOUT).await.unwrap();

        assert_eq!(ip, "192.0.2.1");
    }

    #[tokio::test]
    async fn test_fetch_ipv6_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("2001:db8::1\n"))
            .mount(&mock_server)
            .await;

        let fetcher = IpFetcher::new().unwrap();
        let ip = fetcher.fetch(&mock_server.uri(), TIMEOUT).await.unwrap();

        assert_eq!(ip, "2001:db8::1");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = IpFetcher::new().unwrap();
        let err = fetcher.fetch(&mock_server.uri(), TIMEOUT).await.unwrap_err();

        assert!(matches!(err, DdnsError::Fetch { .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&mock_server)
            .await;

        let fetcher = IpFetcher::new().unwrap();
        let result = fetcher.fetch(&mock_server.uri(), TIMEOUT).await;

        assert!(matches!(result, Err(DdnsError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_fetch_oversized_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>".repeat(200)))
            .mount(&mock_server)
            .await;

        let fetcher = IpFetcher::new().unwrap();
        let err = fetcher.fetch(&mock_server.uri(), TIMEOUT).await.unwrap_err();

        assert!(matches!(err, DdnsError::Fetch { .. }));
        assert!(err.to_string().contains("exceeds 64 bytes"));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("192.0.2.1")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = IpFetcher::new().unwrap();
        let err = fetcher
            .fetch(&mock_server.uri(), Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        let fetcher = IpFetcher::new().unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1", TIMEOUT).await;

        assert!(matches!(result, Err(DdnsError::Fetch { .. })));
    }
}
