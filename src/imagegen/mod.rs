//! Image generation: server-side proxy to a text-to-image provider.
//!
//! DESIGN
//! ======
//! The API key never leaves the server. Handlers depend on the
//! [`ImageGenerator`] trait so tests can swap in a canned generator; the
//! production implementation is [`openai::OpenAiImageClient`], configured
//! from environment variables by [`config::ImageGenConfig::from_env`].
//!
//! No retries and no result caching. Upstream failures are surfaced with
//! their status and body intact so the route can pass them through.

pub mod config;
pub mod openai;
pub mod types;

use config::ImageGenConfig;
use openai::OpenAiImageClient;
pub use types::{ImageGenError, ImageGenerator};

/// Build the production image client from environment variables.
///
/// # Errors
///
/// Returns an error if the API key is missing, the config is malformed, or
/// the HTTP client fails to build.
pub fn from_env() -> Result<OpenAiImageClient, ImageGenError> {
    OpenAiImageClient::new(ImageGenConfig::from_env()?)
}
