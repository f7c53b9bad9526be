//! The three model-backed pipeline stages.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::backend::{
    AudioPayload, BackendError, GenerateRequest, GenerationParameters, ImageFormat,
    InferenceBackend, SpeakRequest,
};

/// Hard cap on newly generated story tokens.
pub const STORY_TOKEN_CAP: u32 = 200;

/// Context window of the story model, in tokens.
const STORY_CONTEXT_BUDGET: u32 = 1024;

/// Errors from the captioning stage.
#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not a JPEG or PNG image")]
    InvalidImage,

    #[error("Model returned an empty caption")]
    EmptyOutput,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Turns an image into a short natural-language description.
pub struct Captioner<'a, B: InferenceBackend> {
    backend: &'a B,
}

impl<'a, B: InferenceBackend> Captioner<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Caption an image file on disk.
    pub fn caption_file(&self, path: &Path) -> Result<String, CaptionError> {
        let bytes = std::fs::read(path)?;
        self.caption_bytes(&bytes)
    }

    /// Caption raw image bytes. The format is sniffed from the leading
    /// magic bytes, never from a file extension.
    pub fn caption_bytes(&self, bytes: &[u8]) -> Result<String, CaptionError> {
        let format = ImageFormat::detect(bytes).ok_or(CaptionError::InvalidImage)?;
        debug!(?format, bytes = bytes.len(), "captioning image");

        let caption = self.backend.caption(bytes, format)?;
        let caption = caption.trim().to_string();
        if caption.is_empty() {
            return Err(CaptionError::EmptyOutput);
        }

        Ok(caption)
    }
}

/// Errors from the story generation stage.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Model returned an empty story")]
    EmptyOutput,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Continues a prompt into a short story.
///
/// The decoding parameters are fixed at construction: exactly one
/// sequence, at most [`STORY_TOKEN_CAP`] new tokens, the prompt truncated
/// server-side so prompt plus generation fits the model's context window,
/// and the full text returned so the story reads as prompt + continuation.
pub struct StoryGenerator<'a, B: InferenceBackend> {
    backend: &'a B,
    parameters: GenerationParameters,
}

impl<'a, B: InferenceBackend> StoryGenerator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            parameters: GenerationParameters {
                max_new_tokens: STORY_TOKEN_CAP,
                num_return_sequences: 1,
                return_full_text: true,
                do_sample: true,
                truncate: Some(STORY_CONTEXT_BUDGET - STORY_TOKEN_CAP),
            },
        }
    }

    /// Generate one continuation of the prompt.
    pub fn generate(&self, prompt: &str) -> Result<String, StoryError> {
        let request = GenerateRequest {
            inputs: prompt.to_string(),
            parameters: self.parameters.clone(),
        };
        debug!(prompt_chars = prompt.len(), "generating story");

        let story = self.backend.generate(&request)?;
        let story = story.trim().to_string();
        if story.is_empty() {
            return Err(StoryError::EmptyOutput);
        }

        Ok(story)
    }

    /// The fixed decoding parameters this generator sends.
    pub fn parameters(&self) -> &GenerationParameters {
        &self.parameters
    }
}

/// Errors from the speech synthesis stage.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Model returned no audio data")]
    EmptyAudio,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Turns text into synthesized speech.
pub struct SpeechSynthesizer<'a, B: InferenceBackend> {
    backend: &'a B,
}

impl<'a, B: InferenceBackend> SpeechSynthesizer<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Synthesize the text into an audio payload.
    pub fn synthesize(&self, text: &str) -> Result<AudioPayload, SpeechError> {
        debug!(text_chars = text.len(), "synthesizing speech");

        let payload = self.backend.synthesize(&SpeakRequest::new(text))?;
        if payload.bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Ok(payload)
    }
}
