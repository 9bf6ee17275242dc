//! Exaroton status API client.
//!
//! Decoding is deliberately loose: a record with odd or missing fields still
//! becomes a snapshot (unknown status, nobody online) instead of a failed poll.

use async_trait::async_trait;
use lantern_core::{PollError, ServerStatus, Snapshot, StatusSource};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default Exaroton API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.exaroton.com/v1";

/// Name used when the API doesn't report one.
const FALLBACK_SERVER_NAME: &str = "Server";

#[derive(Clone)]
pub struct ExarotonClient {
    client: Client,
    base_url: String,
    server_id: String,
    api_key: String,
}

impl ExarotonClient {
    pub fn new(base_url: &str, server_id: &str, api_key: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            server_id: server_id.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn server_url(&self) -> String {
        format!("{}/servers/{}", self.base_url, self.server_id)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<ServerRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerRecord {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    players: Option<Value>,
}

impl ServerRecord {
    fn into_snapshot(self) -> Snapshot {
        let status = self
            .status
            .as_ref()
            .and_then(Value::as_i64)
            .map(ServerStatus::from_code)
            .unwrap_or(ServerStatus::Unknown);

        let name = self
            .name
            .as_ref()
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_SERVER_NAME);

        let players = self
            .players
            .as_ref()
            .and_then(|p| p.get("list"))
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Snapshot::new(status, name, players)
    }
}

/// Decode a raw response body into a snapshot.
pub fn parse_server_response(body: &[u8]) -> Result<Snapshot, PollError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| PollError::Decode(e.to_string()))?;

    if envelope.success == Some(false) {
        return Err(PollError::Rejected(
            envelope.error.unwrap_or_else(|| "no error message".to_string()),
        ));
    }

    envelope
        .data
        .map(ServerRecord::into_snapshot)
        .ok_or(PollError::MissingData)
}

#[async_trait]
impl StatusSource for ExarotonClient {
    async fn poll(&self) -> Result<Snapshot, PollError> {
        let response = self
            .client
            .get(self.server_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Api {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;
        let snapshot = parse_server_response(&body)?;
        debug!(
            status = snapshot.status.label(),
            players = snapshot.players.len(),
            "polled server"
        );
        Ok(snapshot)
    }
}
