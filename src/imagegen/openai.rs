//! OpenAI-compatible `/images/generations` client.
//!
//! Only a connect timeout is configured. A slow generation is bounded by the
//! caller's own abort timer, not by this client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::ImageGenConfig;
use super::types::{ImageGenError, ImageGenerator};

pub struct OpenAiImageClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    size: String,
}

impl OpenAiImageClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ImageGenConfig) -> Result<Self, ImageGenError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ImageGenError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key, base_url: config.base_url, model: config.model, size: config.size })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, ImageGenError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ImageGenError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ImageGenError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(ImageGenError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, ImageGenError> {
        let body = GenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
            response_format: "b64_json",
        };
        let text = self.send_json("/images/generations", &body).await?;
        parse_generation_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'static str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}

/// Pull the first base64 image out of a success body.
fn parse_generation_response(text: &str) -> Result<String, ImageGenError> {
    let resp: GenerationResponse = serde_json::from_str(text).map_err(|e| ImageGenError::ApiParse(e.to_string()))?;
    resp.data
        .into_iter()
        .next()
        .and_then(|image| image.b64_json)
        .filter(|b64| !b64.is_empty())
        .ok_or(ImageGenError::EmptyImage)
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
