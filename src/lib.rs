//! phototale: image to caption to story to speech pipeline.
//!
//! This crate chains three hosted model calls (image captioning, story
//! continuation, speech synthesis) behind a narrow backend trait, exposed
//! through a console binary and a minimal browser UI.

pub mod audio;
pub mod backend;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod web;
