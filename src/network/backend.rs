use crate::config::BackendSettings;
use crate::error::NetworkError;
use crate::network::checkout::CheckoutSubmitter;
use crate::network::poller::{PollResult, TrayPoller};
use crate::tray::DetectedItem;
use async_trait::async_trait;
use std::time::Duration;

/// The two outbound calls the dashboard makes. The controller only talks to
/// the backend through this trait.
#[async_trait]
pub trait TrayBackend: Send + Sync {
    async fn poll_next(&self) -> Result<PollResult, NetworkError>;
    async fn submit(&self, items: Vec<DetectedItem>) -> Result<(), NetworkError>;
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, NetworkError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(NetworkError::ClientBuild)
}

pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Turns any non-2xx response into [`NetworkError::Status`].
pub(crate) async fn ensure_success(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(NetworkError::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Clone)]
pub struct HttpTrayBackend {
    poller: TrayPoller,
    submitter: CheckoutSubmitter,
}

impl HttpTrayBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, NetworkError> {
        let http = build_http_client(settings.request_timeout())?;
        Ok(Self {
            poller: TrayPoller::new(http.clone(), &settings.base_url),
            submitter: CheckoutSubmitter::new(http, &settings.base_url),
        })
    }
}

#[async_trait]
impl TrayBackend for HttpTrayBackend {
    async fn poll_next(&self) -> Result<PollResult, NetworkError> {
        self.poller.poll_next().await
    }

    async fn submit(&self, items: Vec<DetectedItem>) -> Result<(), NetworkError> {
        self.submitter.submit(&items).await
    }
}
