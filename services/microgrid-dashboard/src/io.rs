//! HTTP client abstraction for testability

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with query parameters
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse>;

    /// Send a PUT request with a JSON body
    async fn put_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse>;

    /// Send a DELETE request
    async fn delete(&self, url: &str) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn finish(
        method: &str,
        url: &str,
        sent: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> crate::Result<HttpResponse> {
        let response = sent.map_err(|e| {
            crate::DashboardError::Http(format!("{} {} failed: {}", method, url, e))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::DashboardError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {} {:?}", url, query);
        let sent = self.client.get(url).query(query).send().await;
        Self::finish("GET", url, sent).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let sent = self.client.post(url).json(body).send().await;
        Self::finish("POST", url, sent).await
    }

    async fn put_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        tracing::debug!("PUT {}", url);
        let sent = self.client.put(url).json(body).send().await;
        Self::finish("PUT", url, sent).await
    }

    async fn delete(&self, url: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("DELETE {}", url);
        let sent = self.client.delete(url).send().await;
        Self::finish("DELETE", url, sent).await
    }
}
