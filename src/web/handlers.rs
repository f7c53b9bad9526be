//! HTTP handlers for the browser UI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::info;

use crate::audio::AudioWriter;
use crate::backend::{AudioFormat, InferenceBackend};
use crate::pipeline::{CaptionError, PipelineError, StoryPipeline, StoryRun};

use super::error::WebError;

/// Shared state handed to every handler.
pub struct AppState {
    backend: Arc<dyn InferenceBackend>,
    output_dir: PathBuf,
}

impl AppState {
    pub fn new(backend: Arc<dyn InferenceBackend>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            output_dir: output_dir.into(),
        }
    }
}

/// Multipart form for the story endpoint.
#[derive(Debug, MultipartForm)]
pub struct StoryForm {
    #[multipart(limit = "10MB")]
    pub image: TempFile,
}

/// JSON body returned after a successful run.
#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub caption: String,
    pub story: String,
    pub audio_url: String,
    pub audio_seconds: Option<f32>,
    pub completed_at: String,
}

impl From<StoryRun> for StoryResponse {
    fn from(run: StoryRun) -> Self {
        let file_name = run
            .audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        Self {
            audio_url: format!("/audio/{file_name}"),
            caption: run.caption,
            story: run.story,
            audio_seconds: run.audio_seconds,
            completed_at: run.completed_at,
        }
    }
}

/// Serve the single-page UI.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("index.html"))
}

/// Run the whole pipeline on an uploaded image.
pub async fn run_story(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<StoryForm>,
) -> Result<HttpResponse, WebError> {
    if form.image.size == 0 {
        return Err(WebError::InvalidUpload("Empty image upload".to_string()));
    }
    info!(bytes = form.image.size, "image upload received");

    let backend = Arc::clone(&state.backend);
    let output_dir = state.output_dir.clone();
    let upload = form.image.file;

    // The model calls are blocking; keep them off the async workers. The
    // temp file is dropped, and so deleted, inside the closure.
    let result = web::block(move || {
        let pipeline = StoryPipeline::new(backend, AudioWriter::with_dir(output_dir));
        let result = pipeline.run(upload.path(), None);
        drop(upload);
        result
    })
    .await
    .map_err(|e| WebError::Internal(e.to_string()))?;

    let run = result.map_err(|e| match e {
        PipelineError::Caption(CaptionError::InvalidImage) => {
            WebError::InvalidUpload("Expected a JPEG or PNG image".to_string())
        }
        other => WebError::Pipeline(other),
    })?;

    Ok(HttpResponse::Ok().json(StoryResponse::from(run)))
}

/// Serve a generated audio file by name.
pub async fn serve_audio(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, WebError> {
    let name = name.into_inner();

    // Names are flat; anything path-like is rejected.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(WebError::NotFound(name));
    }

    let path = state.output_dir.join(&name);
    let bytes = web::block(move || std::fs::read(path))
        .await
        .map_err(|e| WebError::Internal(e.to_string()))?
        .map_err(|_| WebError::NotFound(name.clone()))?;

    let content_type = Path::new(&name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(AudioFormat::from_extension)
        .map(|f| f.content_type())
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
