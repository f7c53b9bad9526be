//! The image-to-story-to-speech pipeline.

mod runner;
mod stages;

pub use runner::{PipelineError, StoryPipeline, StoryRun};
pub use stages::{
    CaptionError, Captioner, STORY_TOKEN_CAP, SpeechError, SpeechSynthesizer, StoryError,
    StoryGenerator,
};
