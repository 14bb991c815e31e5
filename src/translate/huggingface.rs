use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use super::interface::{TranslateResponse, Translator};

/// Translation through a Hugging Face style inference endpoint
/// (`POST {base_url}/models/{model}`)
pub struct HuggingFaceTranslator {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HuggingFaceTranslator {
    pub fn new(
        base_url: &str,
        model: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        let endpoint = format!("{}/models/{}", base_url.trim_end_matches('/'), model);
        info!("Initialized HuggingFaceTranslator: endpoint={}", endpoint);
        Ok(Self {
            client,
            endpoint,
            api_token,
        })
    }
}

#[async_trait]
impl Translator for HuggingFaceTranslator {
    async fn translate(&self, text: &str, max_length: usize) -> Result<String> {
        let body = json!({
            "inputs": text,
            "parameters": { "max_length": max_length },
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        debug!("Sending {} chars to {}", text.len(), self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("{} returned {}: {}", self.endpoint, status, payload.trim());
        }

        serde_json::from_str::<TranslateResponse>(&payload)
            .with_context(|| format!("unexpected response from {}", self.endpoint))?
            .into_first()
    }
}
