use async_trait::async_trait;
use tracing::debug;

use crate::config::AiConfig;

/// Opaque text-completion capability: prompt in, completion out.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(cfg: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        }
    }
}

#[async_trait]
impl TextCompletion for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("completion upstream returned {}", status);
        }

        let payload: serde_json::Value = resp.json().await?;
        let text = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("malformed completion response"))?;

        debug!(model = %self.model, chars = text.len(), "completion received");
        Ok(text.to_string())
    }
}
