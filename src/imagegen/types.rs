//! Image-generation errors and the provider-neutral trait.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while configuring or calling the image provider.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The env var holding the API key is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider answered with a non-success status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The success body was not the expected JSON shape.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider succeeded but returned no image payload.
    #[error("API response contained no image")]
    EmptyImage,
}

// =============================================================================
// TRAIT
// =============================================================================

/// Text-to-image generation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for `prompt` and return it base64-encoded.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageGenError`] if the request fails, the provider rejects
    /// it, or the response carries no image.
    async fn generate(&self, prompt: &str) -> Result<String, ImageGenError>;
}
