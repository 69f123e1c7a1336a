// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{InferenceClient, cancellable, http_client, request_error, status_error};
use crate::config::Config;
use crate::error::{InferenceError, Result};
use crate::services::prompt::SYSTEM_PROMPT;

/// Client for OpenAI-compatible chat servers (llama.cpp `llama-server`,
/// vLLM, LM Studio).
pub struct OpenAiClient {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.host);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!(url = %url, model = %self.model, prompt_chars = prompt.len(), "sending request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(e, &self.host, self.timeout_secs))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| request_error(e, &self.host, self.timeout_secs))?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::MalformedResponse("no choices in response".into()))?
            .message
            .content
            .unwrap_or_default();

        debug!(response_chars = content.len(), "response received");
        Ok(content)
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn generate(&self, prompt: &str, cancel: CancellationToken) -> Result<String> {
        cancellable(self.request(prompt), cancel).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}
