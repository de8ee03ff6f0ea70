use crate::error::NetworkError;
use crate::network::backend::{endpoint_url, ensure_success};
use crate::tray::DetectedItem;
use serde::Serialize;
use tracing::debug;

const ENDPOINT: &str = "/checkout";

#[derive(Debug, Serialize)]
struct CheckoutRequest<'a> {
    tray_list: &'a [DetectedItem],
}

#[derive(Debug, Clone)]
pub struct CheckoutSubmitter {
    http: reqwest::Client,
    url: String,
}

impl CheckoutSubmitter {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: endpoint_url(base_url, ENDPOINT),
        }
    }

    /// Sends the full tray. Only the status code matters; the body is not read.
    pub async fn submit(&self, items: &[DetectedItem]) -> Result<(), NetworkError> {
        debug!("Submitting {} items to {}", items.len(), self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&CheckoutRequest { tray_list: items })
            .send()
            .await
            .map_err(|source| NetworkError::Request {
                endpoint: ENDPOINT,
                source,
            })?;
        ensure_success(ENDPOINT, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::backend::build_http_client;
    use crate::network::test_support::serve_once;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn submitter(base_url: &str) -> CheckoutSubmitter {
        CheckoutSubmitter::new(build_http_client(Duration::from_secs(2)).unwrap(), base_url)
    }

    #[tokio::test]
    async fn posts_tray_list() {
        let (base_url, server) = serve_once("200 OK", "").await;
        let items = vec![DetectedItem::new("glazed", 0.9), DetectedItem::new("plain", 0.6)];

        submitter(&base_url).submit(&items).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.head.starts_with("POST /checkout "));
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            json!({"tray_list": [
                {"label": "glazed", "conf": 0.9},
                {"label": "plain", "conf": 0.6}
            ]})
        );
    }

    #[tokio::test]
    async fn any_success_status_is_accepted() {
        let (base_url, server) = serve_once("204 No Content", "").await;
        submitter(&base_url)
            .submit(&[DetectedItem::new("plain", 0.5)])
            .await
            .unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejected_checkout_is_network_error() {
        let (base_url, server) = serve_once("500 Internal Server Error", "payment down").await;

        let error = submitter(&base_url)
            .submit(&[DetectedItem::new("plain", 0.5)])
            .await
            .unwrap_err();
        assert!(matches!(error, NetworkError::Status { status: 500, .. }));
        server.await.unwrap();
    }
}
