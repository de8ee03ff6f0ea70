use crate::error::NetworkError;
use crate::network::backend::{endpoint_url, ensure_success};
use crate::tray::DetectedItem;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const ENDPOINT: &str = "/next";

/// One normalized answer from the poll endpoint. Consumed once by the
/// controller and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResult {
    pub alert_raised: bool,
    pub items: Vec<DetectedItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PollEnvelope {
    data: TrayPayload,
}

#[derive(Debug, Default, Deserialize)]
struct TrayPayload {
    #[serde(default)]
    alert: Value,
    #[serde(default)]
    donut_tray: Option<Vec<Value>>,
}

impl From<PollEnvelope> for PollResult {
    fn from(envelope: PollEnvelope) -> Self {
        let payload = envelope.data;
        Self {
            alert_raised: matches!(payload.alert, Value::Bool(true)),
            items: payload
                .donut_tray
                .unwrap_or_default()
                .iter()
                .map(DetectedItem::from_raw)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrayPoller {
    http: reqwest::Client,
    url: String,
}

impl TrayPoller {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: endpoint_url(base_url, ENDPOINT),
        }
    }

    /// Fetches the latest detection result set.
    pub async fn poll_next(&self) -> Result<PollResult, NetworkError> {
        debug!("Polling {}", self.url);
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| NetworkError::Request {
                endpoint: ENDPOINT,
                source,
            })?;
        let response = ensure_success(ENDPOINT, response).await?;
        let envelope: PollEnvelope =
            response
                .json()
                .await
                .map_err(|source| NetworkError::Decode {
                    endpoint: ENDPOINT,
                    source,
                })?;
        let result = PollResult::from(envelope);
        debug!(
            "Poll returned {} items (alert: {})",
            result.items.len(),
            result.alert_raised
        );
        Ok(result)
    }
}
