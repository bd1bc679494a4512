//! Image-generation configuration parsed from environment variables.

use super::types::ImageGenError;

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "dall-e-3";
pub const DEFAULT_SIZE: &str = "1024x1024";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenConfig {
    pub api_key: String,
    pub model: String,
    pub size: String,
    pub base_url: String,
    pub connect_timeout_secs: u64,
}

impl ImageGenConfig {
    /// Build typed config from environment variables.
    ///
    /// - `IMAGE_GEN_API_KEY_ENV`: names the env var holding the key (default `OPENAI_API_KEY`)
    /// - `IMAGE_GEN_MODEL`: default `dall-e-3`
    /// - `IMAGE_GEN_SIZE`: `WIDTHxHEIGHT`, default `1024x1024`
    /// - `IMAGE_GEN_BASE_URL`: OpenAI-compatible API base
    /// - `IMAGE_GEN_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the size is malformed.
    pub fn from_env() -> Result<Self, ImageGenError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ImageGenConfig::from_env`], reading variables through `var`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the size is malformed.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ImageGenError> {
        let key_var = var("IMAGE_GEN_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = var(&key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ImageGenError::MissingApiKey { var: key_var.clone() })?;

        let model = var("IMAGE_GEN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let size = parse_size(var("IMAGE_GEN_SIZE").as_deref())?;
        let base_url = var("IMAGE_GEN_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let connect_timeout_secs = parse_u64(var("IMAGE_GEN_CONNECT_TIMEOUT_SECS").as_deref(), DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self { api_key, model, size, base_url, connect_timeout_secs })
    }
}

fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_size(raw: Option<&str>) -> Result<String, ImageGenError> {
    let raw = raw.unwrap_or(DEFAULT_SIZE).trim();
    let valid = raw
        .split_once('x')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok_and(|w| w > 0) && h.parse::<u32>().is_ok_and(|h| h > 0));
    if !valid {
        return Err(ImageGenError::ConfigParse(format!("invalid IMAGE_GEN_SIZE '{raw}' (expected WIDTHxHEIGHT)")));
    }
    Ok(raw.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
