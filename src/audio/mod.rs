//! Audio file output.

mod output;

pub use output::{AudioError, AudioWriter, DEFAULT_STEM, SavedAudio};
