//! CodeRabbit report API client.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::CodeRabbitConfig;
use crate::error::{Result, RevdashError};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-coderabbitai-api-key";

/// User agent string for report requests.
const USER_AGENT: &str = "revdash/0.1 (report client)";

/// Client for the upstream report service.
#[derive(Clone)]
pub struct CodeRabbitClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl CodeRabbitClient {
    /// Create a client from configuration.
    pub fn new(config: &CodeRabbitConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                RevdashError::ExternalService(format!("failed to create HTTP client: {}", e))
            })?;

        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a report for `from..=to`.
    ///
    /// The raw JSON is returned; callers validate it against the schema they need.
    pub async fn fetch_report(&self, from: NaiveDate, to: NaiveDate) -> Result<Value> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RevdashError::ExternalService("CODERABBIT_API_KEY not set".into()))?;

        let url = format!("{}/report.generate", self.api_base);
        tracing::debug!(%from, %to, "Requesting CodeRabbit report");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&json!({ "from": from.to_string(), "to": to.to_string() }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "CodeRabbit request failed");
                RevdashError::ExternalService(format!("report request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "CodeRabbit returned an error status");
            return Err(RevdashError::ExternalService(format!(
                "report service returned {}",
                status
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            RevdashError::ExternalService(format!("invalid report response: {}", e))
        })
    }
}
