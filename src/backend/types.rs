//! Backend request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when communicating with the serving API.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Error body returned by the serving API on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Image formats accepted by the captioning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Sniff the format from the leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// MIME type sent as the request content type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// One captioning candidate from the image-to-text model.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionCandidate {
    pub generated_text: String,
}

/// One generated sequence from the text-generation model.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSequence {
    pub generated_text: String,
}

/// Request for text generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

/// Decoding parameters for text generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub num_return_sequences: u32,
    pub return_full_text: bool,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<u32>,
}

/// Request for speech synthesis.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakRequest {
    pub inputs: String,
}

impl SpeakRequest {
    /// Create a new synthesis request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inputs: text.into(),
        }
    }
}

/// Audio container formats the serving API emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Flac,
    Mp3,
}

impl AudioFormat {
    /// Map a response content type to a format. Unknown types default to
    /// FLAC, which is what VITS-family models emit.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        match essence {
            "audio/wav" | "audio/x-wav" | "audio/wave" => Self::Wav,
            "audio/mpeg" | "audio/mp3" => Self::Mp3,
            _ => Self::Flac,
        }
    }

    /// Map a file extension back to a format, if recognized.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "wav" => Some(Self::Wav),
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    /// File extension used when saving audio of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
        }
    }

    /// Content type used when serving audio of this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Mp3 => "audio/mpeg",
        }
    }
}

/// Raw synthesized audio plus its container format.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}
