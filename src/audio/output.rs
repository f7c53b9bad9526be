//! Writing synthesized audio to disk.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::{AudioFormat, AudioPayload};

/// Filename stem used when no description is given.
pub const DEFAULT_STEM: &str = "story_audio";

/// Errors that can occur while saving audio.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A saved audio file.
#[derive(Debug, Clone)]
pub struct SavedAudio {
    pub path: PathBuf,
    pub bytes_written: usize,
    /// Clip length in seconds, when the container could be probed.
    pub seconds: Option<f32>,
}

/// Writes audio payloads into a fixed output directory.
///
/// Filenames are derived from an optional description; repeated writes
/// with the same description overwrite the same file.
pub struct AudioWriter {
    output_dir: PathBuf,
}

impl AudioWriter {
    /// Create a writer targeting the working directory.
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }

    /// Create a writer targeting a specific directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: dir.into(),
        }
    }

    /// Compute the path a payload with this description would be saved to.
    pub fn output_path(
        &self,
        description: Option<&str>,
        format: AudioFormat,
    ) -> Result<PathBuf, AudioError> {
        let stem = match description {
            Some(description) => sanitize_stem(description)
                .ok_or_else(|| AudioError::InvalidDescription(description.to_string()))?,
            None => DEFAULT_STEM.to_string(),
        };

        Ok(self.output_dir.join(format!("{stem}.{}", format.extension())))
    }

    /// Write the payload, overwriting any previous file at the same path.
    pub fn write(
        &self,
        payload: &AudioPayload,
        description: Option<&str>,
    ) -> Result<SavedAudio, AudioError> {
        let path = self.output_path(description, payload.format)?;

        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::write(&path, &payload.bytes)?;
        debug!(path = %path.display(), bytes = payload.bytes.len(), "audio written");

        let seconds = match payload.format {
            AudioFormat::Wav => probe_wav_seconds(&payload.bytes),
            _ => None,
        };

        Ok(SavedAudio {
            path,
            bytes_written: payload.bytes.len(),
            seconds,
        })
    }

    /// Directory this writer saves into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for AudioWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a free-form description into a safe lowercase filename stem.
fn sanitize_stem(description: &str) -> Option<String> {
    let stem: String = description
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let stem = stem.trim_matches('_').to_string();
    if stem.is_empty() { None } else { Some(stem) }
}

/// Read the clip length from a WAV header. Probing failure is not fatal;
/// the file is already on disk.
fn probe_wav_seconds(bytes: &[u8]) -> Option<f32> {
    match hound::WavReader::new(Cursor::new(bytes)) {
        Ok(reader) => {
            let spec = reader.spec();
            Some(reader.duration() as f32 / spec.sample_rate as f32)
        }
        Err(e) => {
            warn!("Could not probe WAV header: {e}");
            None
        }
    }
}
