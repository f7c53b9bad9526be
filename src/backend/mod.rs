//! Communication with the hosted model-serving API.
//!
//! Provides the trait and HTTP implementation for the three model calls
//! the pipeline makes (captioning, text generation, speech synthesis).

mod client;
mod types;

pub use client::{DEFAULT_ENDPOINT, HttpBackend};
pub use types::{
    AudioFormat, AudioPayload, BackendError, GenerateRequest, GenerationParameters, ImageFormat,
    SpeakRequest,
};

use std::sync::Arc;

use crate::config::AppConfig;

/// Image captioning model identifier.
pub const CAPTION_MODEL: &str = "Salesforce/blip-image-captioning-base";

/// Story generation model identifier.
pub const STORY_MODEL: &str = "openai-community/gpt2";

/// Speech synthesis model identifier.
pub const SPEECH_MODEL: &str = "facebook/mms-tts-eng";

/// Trait for inference API communication.
///
/// This trait abstracts the HTTP communication with the model-serving
/// layer, allowing for mock implementations in tests.
#[cfg_attr(test, mockall::automock)]
pub trait InferenceBackend: Send + Sync {
    /// Caption an image.
    ///
    /// # Arguments
    /// * `image` - Raw image bytes
    /// * `format` - Sniffed image format, sent as the content type
    fn caption(&self, image: &[u8], format: ImageFormat) -> Result<String, BackendError>;

    /// Generate a text continuation for a prompt.
    fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError>;

    /// Synthesize speech from text.
    ///
    /// # Returns
    /// Raw audio data tagged with its container format
    fn synthesize(&self, request: &SpeakRequest) -> Result<AudioPayload, BackendError>;
}

impl<T: InferenceBackend + ?Sized> InferenceBackend for Arc<T> {
    fn caption(&self, image: &[u8], format: ImageFormat) -> Result<String, BackendError> {
        (**self).caption(image, format)
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError> {
        (**self).generate(request)
    }

    fn synthesize(&self, request: &SpeakRequest) -> Result<AudioPayload, BackendError> {
        (**self).synthesize(request)
    }
}

/// Create the production backend from the application configuration.
pub fn create_backend(config: &AppConfig) -> HttpBackend {
    HttpBackend::new(&config.endpoint, config.api_token.clone())
}
