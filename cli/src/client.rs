//! HTTP client for the drawing endpoints.

use std::time::Duration;

use canvas::session::SaveRequest;
use reqwest::header::{COOKIE, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::CliError;

/// A drawing as returned by `GET /Drawings` and `GET /Drawings/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedDrawing {
    pub id: i64,
    pub pixel_data: String,
    pub grid_size: Option<usize>,
}

pub struct DrawingClient {
    http: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl DrawingClient {
    pub fn new(base_url: &str, session_token: Option<String>) -> Result<Self, CliError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), session_token })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder, CliError> {
        let token = self
            .session_token
            .as_deref()
            .ok_or(CliError::MissingSessionToken)?;
        let cookie = HeaderValue::from_str(&format!("session_token={token}"))?;
        Ok(request.header(COOKIE, cookie))
    }

    pub async fn ping(&self) -> Result<(), CliError> {
        let response = self.http.get(self.url("/healthz")).send().await?;
        ensure_success(response).await.map(|_| ())
    }

    pub async fn list(&self) -> Result<Vec<ListedDrawing>, CliError> {
        let request = self.authed(self.http.get(self.url("/Drawings")))?;
        let response = ensure_success(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn get(&self, id: i64) -> Result<ListedDrawing, CliError> {
        let request = self.authed(self.http.get(self.url(&format!("/Drawings/{id}"))))?;
        let response = ensure_success(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Create or update; returns the id the server assigned or confirmed.
    pub async fn save(&self, body: &SaveRequest) -> Result<i64, CliError> {
        let request = self.authed(self.http.post(self.url("/Drawings/Save")))?;
        let response = ensure_success(request.json(body).send().await?).await?;
        let value: Value = response.json().await?;
        value
            .get("id")
            .and_then(Value::as_i64)
            .ok_or(CliError::MissingField("id"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), CliError> {
        let request = self.authed(self.http.post(self.url("/Drawings/DeleteAjax")))?;
        ensure_success(request.json(&id).send().await?).await?;
        Ok(())
    }

    /// Ask the server for a generated image, giving up after `limit`.
    ///
    /// Returns the base64 payload.
    pub async fn generate(&self, prompt: &str, size: &str, limit: Duration) -> Result<String, CliError> {
        let request = self
            .http
            .post(self.url("/Drawings/GenerateImage"))
            .json(&serde_json::json!({ "prompt": prompt, "size": size }));

        let value: Value = tokio::time::timeout(limit, async {
            let response = ensure_success(request.send().await?).await?;
            Ok::<_, CliError>(response.json::<Value>().await?)
        })
        .await
        .map_err(|_| CliError::Timeout(limit.as_secs()))??;

        image_payload(&value)
    }
}

async fn ensure_success(response: Response) -> Result<Response, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(CliError::ServerError { status: status.as_u16(), message })
}

pub(crate) fn image_payload(value: &Value) -> Result<String, CliError> {
    value
        .get("imageBase64")
        .and_then(Value::as_str)
        .filter(|b64| !b64.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(CliError::MissingField("imageBase64"))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
