//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// Image-to-story-to-speech pipeline.
#[derive(Parser, Debug)]
#[command(name = "phototale")]
#[command(about = "Turn an image into a short narrated story")]
#[command(version)]
pub struct Args {
    /// Image to start from (JPEG or PNG)
    #[arg(default_value = "test-images/mock_interview.jpg")]
    pub image: PathBuf,

    /// Short description used to name the saved audio file
    #[arg(short, long)]
    pub describe: Option<String>,

    /// Inference API endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
