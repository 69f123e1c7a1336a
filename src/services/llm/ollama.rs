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

pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
    num_predict: u32,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            // Sanitize: remove trailing slashes to avoid //api/chat
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.host);
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
            stream: false,
            options: Options {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
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

        debug!(response_chars = parsed.message.content.len(), "response received");
        Ok(parsed.message.content)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn generate(&self, prompt: &str, cancel: CancellationToken) -> Result<String> {
        cancellable(self.request(prompt), cancel).await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
