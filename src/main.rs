//! phototale console entry point.

use anyhow::{Context, Result};
use clap::Parser;
use phototale::audio::AudioWriter;
use phototale::backend::create_backend;
use phototale::cli::Args;
use phototale::config::AppConfig;
use phototale::pipeline::StoryPipeline;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
        config.validate().context("Invalid endpoint override")?;
    }

    let backend = create_backend(&config);
    let pipeline = StoryPipeline::new(backend, AudioWriter::new());

    println!("Running pipeline on: {}", args.image.display());

    let run = match pipeline.run(&args.image, args.describe.as_deref()) {
        Ok(run) => run,
        Err(e) => {
            // A mid-pipeline failure is reported, not signaled via exit code.
            eprintln!("Pipeline stopped: {e}");
            return Ok(());
        }
    };

    println!("Caption: {}", run.caption);
    println!();
    println!("{}", run.story);
    println!();
    println!("Audio saved to: {}", run.audio_path.display());
    println!("  Size: {} bytes", run.audio_bytes);
    if let Some(seconds) = run.audio_seconds {
        println!("  Duration: {seconds:.2}s");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "phototale=debug"
    } else {
        "phototale=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
