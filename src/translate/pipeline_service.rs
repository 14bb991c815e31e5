use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::interface::{TranslateResponse, Translator};

#[derive(Debug, Serialize)]
struct PipelineRequest<'a> {
    text: &'a str,
    model: &'a str,
    max_length: usize,
}

/// Translation through a local model-serving sidecar (`POST {base_url}/translate`)
pub struct PipelineServiceTranslator {
    client: Client,
    base_url: String,
    model: String,
}

impl PipelineServiceTranslator {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        info!(
            "Initialized PipelineServiceTranslator: model={}, base_url={}",
            model, base_url
        );
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Translator for PipelineServiceTranslator {
    async fn translate(&self, text: &str, max_length: usize) -> Result<String> {
        let url = format!("{}/translate", self.base_url);
        let request = PipelineRequest {
            text,
            model: &self.model,
            max_length,
        };

        debug!("Sending {} chars to {}", text.len(), url);
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("{} returned {}: {}", url, status, payload.trim());
        }

        serde_json::from_str::<TranslateResponse>(&payload)
            .with_context(|| format!("unexpected response from {}", url))?
            .into_first()
    }
}
