//! Rule gateway over the compliance REST API

use async_trait::async_trait;
use netcomply_core::{GatewayError, Result, Rule, RuleId, RulePayload};
use netcomply_rules::RulePersistenceGateway;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;

const RULES_PATH: &str = "api/v1/rules";

/// [`RulePersistenceGateway`] backed by the rules API
pub struct HttpRuleGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRuleGateway {
    /// Build a gateway from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn rules_url(&self) -> Result<Url> {
        self.join(RULES_PATH)
    }

    fn rule_url(&self, id: RuleId, suffix: &str) -> Result<Url> {
        self.join(&format!("{}/{}{}", RULES_PATH, id, suffix))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| netcomply_core::Error::config(format!("invalid rules URL: {}", e)))
    }

    /// Send a request and decode a JSON body from a successful response
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        id: Option<RuleId>,
    ) -> Result<T> {
        let (status, body) = self.execute(request, id).await?;

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::Unexpected {
                status: status.as_u16(),
                body: format!("undecodable response body: {}", e),
            }
            .into()
        })
    }

    /// Send a request, mapping non-success statuses to gateway errors
    async fn execute(
        &self,
        request: RequestBuilder,
        id: Option<RuleId>,
    ) -> Result<(StatusCode, String)> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if status.is_success() {
            debug!(status = %status, "Rules API request succeeded");
            return Ok((status, body));
        }

        let err = map_status(status, &body, id);
        warn!(status = %status, error = %err, "Rules API request failed");
        Err(err.into())
    }
}

#[async_trait]
impl RulePersistenceGateway for HttpRuleGateway {
    async fn list(&self) -> Result<Vec<Rule>> {
        let url = self.rules_url()?;
        self.fetch(self.client.get(url), None).await
    }

    async fn create(&self, payload: RulePayload) -> Result<Rule> {
        let url = self.rules_url()?;
        self.fetch(self.client.post(url).json(&payload), None).await
    }

    async fn update(&self, id: RuleId, payload: RulePayload) -> Result<Rule> {
        let url = self.rule_url(id, "")?;
        self.fetch(self.client.put(url).json(&payload), Some(id)).await
    }

    async fn delete(&self, id: RuleId) -> Result<()> {
        let url = self.rule_url(id, "")?;
        self.execute(self.client.delete(url), Some(id)).await?;
        Ok(())
    }

    async fn toggle(&self, id: RuleId) -> Result<Rule> {
        let url = self.rule_url(id, "/toggle")?;
        self.fetch(self.client.post(url), Some(id)).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Translate an error response into a gateway error
fn map_status(status: StatusCode, body: &str, id: Option<RuleId>) -> GatewayError {
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => GatewayError::NotFound(id),
        (StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            GatewayError::Rejected(error_detail(body))
        }
        _ => GatewayError::Unexpected {
            status: status.as_u16(),
            body: error_detail(body),
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}`,
/// `{"error": "..."}` and `{"message": "..."}`; anything else is returned
/// as trimmed text.
fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(items) = value.get("detail").and_then(|d| d.as_array()) {
        let messages: Vec<&str> = items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    ["detail", "error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(ToString::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
