// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

pub mod ollama;
pub mod openai;

use crate::config::{Config, Provider};
use crate::error::{Error, InferenceError, Result};

/// Longest slice of an error body kept in `InferenceError::Status`.
const MAX_ERROR_BODY: usize = 500;

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send one prompt, wait for the whole reply. Cancelling the token
    /// drops the request and returns `Error::Interrupted`.
    async fn generate(&self, prompt: &str, cancel: CancellationToken) -> Result<String>;

    fn name(&self) -> &str;
}

pub fn create_client(config: &Config) -> Result<Box<dyn InferenceClient>> {
    match config.provider {
        Provider::OpenAI => Ok(Box::new(openai::OpenAiClient::new(config)?)),
        Provider::Ollama => Ok(Box::new(ollama::OllamaClient::new(config)?)),
    }
}

pub(crate) fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| InferenceError::Http(e.to_string()).into())
}

/// Classify a transport failure.
pub(crate) fn request_error(e: reqwest::Error, host: &str, timeout_secs: u64) -> Error {
    if e.is_timeout() {
        InferenceError::Timeout { secs: timeout_secs }.into()
    } else if e.is_connect() {
        InferenceError::Unreachable { host: host.into() }.into()
    } else {
        InferenceError::Http(e.to_string()).into()
    }
}

/// Turn a non-success response into `InferenceError::Status`.
pub(crate) async fn status_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let body: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    InferenceError::Status { status, body }.into()
}

/// Race `request` against Ctrl-C.
pub(crate) async fn cancellable<T>(
    request: impl Future<Output = Result<T>>,
    cancel: CancellationToken,
) -> Result<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Interrupted),
        result = request => result,
    }
}
