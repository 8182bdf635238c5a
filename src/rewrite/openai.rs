//! OpenAI-compatible chat-completion rewriter.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::Rewriter;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

pub struct OpenAiRewriter {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    endpoint: String,
}

impl OpenAiRewriter {
    pub fn new(
        api_key: String,
        model: Option<String>,
        temperature: f32,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }
}

#[async_trait]
impl Rewriter for OpenAiRewriter {
    fn name(&self) -> &'static str {
        "OpenAI chat API"
    }

    async fn rewrite(&self, prompt: &str) -> Result<String> {
        debug!(
            "Sending rewrite request with model {} ({} chars)",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "temperature": self.temperature,
                "messages": [
                    {"role": "user", "content": prompt}
                ]
            }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("Failed to send rewrite request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!("Rewrite request failed with status {}: {}", status, error_text);
            return Err(anyhow!(
                "Rewrite request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse rewrite response")?;

        let text = chat
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow!("Rewrite response contained no choices"))?;

        info!("Rewrite complete: {} chars", text.len());
        Ok(text)
    }
}
