//! Sequential composition of the pipeline stages.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::audio::{AudioError, AudioWriter};
use crate::backend::InferenceBackend;

use super::stages::{CaptionError, Captioner, SpeechError, SpeechSynthesizer, StoryError, StoryGenerator};

/// A pipeline failure, tagged with the stage that produced it.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Caption stage failed: {0}")]
    Caption(#[from] CaptionError),

    #[error("Story stage failed: {0}")]
    Story(#[from] StoryError),

    #[error("Speech stage failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("Audio output failed: {0}")]
    Audio(#[from] AudioError),
}

/// The result of one complete pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct StoryRun {
    pub caption: String,
    pub story: String,
    pub audio_path: PathBuf,
    pub audio_bytes: usize,
    pub audio_seconds: Option<f32>,
    pub completed_at: String,
}

/// Runs caption, story, and speech in order, stopping at the first error.
///
/// Each stage's output, if non-empty, becomes the next stage's input
/// unchanged. Later stages are never invoked once a stage fails.
pub struct StoryPipeline<B: InferenceBackend> {
    backend: B,
    writer: AudioWriter,
}

impl<B: InferenceBackend> StoryPipeline<B> {
    pub fn new(backend: B, writer: AudioWriter) -> Self {
        Self { backend, writer }
    }

    /// Run the full pipeline on an image file.
    pub fn run(
        &self,
        image: &Path,
        description: Option<&str>,
    ) -> Result<StoryRun, PipelineError> {
        let caption = Captioner::new(&self.backend)
            .caption_file(image)
            .inspect_err(|e| error!("caption stage failed: {e}"))?;
        info!(caption = %caption, "caption complete");

        self.continue_from(caption, description)
    }

    /// Run the story and speech stages on raw image bytes.
    pub fn run_bytes(
        &self,
        image: &[u8],
        description: Option<&str>,
    ) -> Result<StoryRun, PipelineError> {
        let caption = Captioner::new(&self.backend)
            .caption_bytes(image)
            .inspect_err(|e| error!("caption stage failed: {e}"))?;
        info!(caption = %caption, "caption complete");

        self.continue_from(caption, description)
    }

    fn continue_from(
        &self,
        caption: String,
        description: Option<&str>,
    ) -> Result<StoryRun, PipelineError> {
        let story = StoryGenerator::new(&self.backend)
            .generate(&caption)
            .inspect_err(|e| error!("story stage failed: {e}"))?;
        info!(story_chars = story.len(), "story complete");

        let payload = SpeechSynthesizer::new(&self.backend)
            .synthesize(&story)
            .inspect_err(|e| error!("speech stage failed: {e}"))?;

        let saved = self
            .writer
            .write(&payload, description)
            .inspect_err(|e| error!("audio output failed: {e}"))?;
        info!(path = %saved.path.display(), "audio saved");

        Ok(StoryRun {
            caption,
            story,
            audio_path: saved.path,
            audio_bytes: saved.bytes_written,
            audio_seconds: saved.seconds,
            completed_at: Utc::now().to_rfc3339(),
        })
    }
}
