//! HTTP-backed implementation of the alert document source.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use super::traits::{AlertSource, AlertSourceError};

/// Fetches the alert document from a configured URL.
///
/// The injected client already carries the request timeout and retry policy,
/// so a slow or flaky source degrades to a skipped poll rather than a stall.
pub struct HttpAlertSource {
    /// HTTP client with timeout and retry middleware.
    client: ClientWithMiddleware,
    /// The alert document URL.
    url: Url,
}

impl HttpAlertSource {
    /// Creates a new `HttpAlertSource` for the given URL.
    pub fn new(client: ClientWithMiddleware, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl AlertSource for HttpAlertSource {
    async fn fetch_document(&self) -> Result<String, AlertSourceError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AlertSourceError::Status(status));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use reqwest_middleware::ClientBuilder;

    use super::*;

    fn create_test_http_client() -> ClientWithMiddleware {
        ClientBuilder::new(reqwest::Client::new()).build()
    }

    fn create_test_source(server: &mockito::Server) -> HttpAlertSource {
        let url = Url::parse(&format!("{}/alerts.js", server.url())).unwrap();
        HttpAlertSource::new(create_test_http_client(), url)
    }

    #[tokio::test]
    async fn test_fetch_document_returns_the_body_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/alerts.js")
            .with_status(200)
            .with_body("alert_content = \"Building X closed\"; alert_default = \"\";")
            .create_async()
            .await;

        let source = create_test_source(&server);
        let document = source.fetch_document().await.unwrap();

        assert!(document.contains("Building X closed"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_document_surfaces_non_success_status_as_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/alerts.js")
            .with_status(503)
            .create_async()
            .await;

        let source = create_test_source(&server);
        let result = source.fetch_document().await;

        assert!(matches!(
            result,
            Err(AlertSourceError::Status(status))
                if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
        mock.assert_async().await;
    }
}
