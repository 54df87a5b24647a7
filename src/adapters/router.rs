use crate::domain::model::TranslationResult;
use crate::domain::ports::Translator;
use crate::utils::error::{Result, TranslateError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const TRANSLATE_PATH: &str = "/api/translate";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    model: &'a str,
    texts: &'a [String],
}

/// HTTP client for the router's translate endpoint. One request per batch, no retries.
#[derive(Debug, Clone)]
pub struct RouterClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl RouterClient {
    pub fn new(router_host: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            TranslateError::invalid_config("router_host", router_host, format!("cannot build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", router_host.trim_end_matches('/'), TRANSLATE_PATH),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Translator for RouterClient {
    async fn translate(&self, texts: &[String]) -> Result<TranslationResult> {
        let request = TranslateRequest {
            model: &self.model,
            texts,
        };

        tracing::debug!("POST {} with {} texts", self.endpoint, texts.len());
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::upstream(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::upstream(format!(
                "router returned {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::upstream(format!("undecodable router response: {}", e)))?;

        Ok(TranslationResult::from_response(body))
    }
}
