//! Browser UI served over HTTP.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::{AppState, StoryResponse};

use actix_web::web;

/// Register the three routes the UI uses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/api/story", web::post().to(handlers::run_story))
        .route("/audio/{name}", web::get().to(handlers::serve_audio));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AudioFormat, AudioPayload, BackendError, MockInferenceBackend};
    use actix_web::{App, test, web::Data};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

    fn app_state(mock: MockInferenceBackend, output_dir: &Path) -> Data<AppState> {
        Data::new(AppState::new(Arc::new(mock), output_dir))
    }

    fn multipart_image(bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "----phototale-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"image\"; filename=\"upload.jpg\"\r\n\
                 Content-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    fn happy_mock() -> MockInferenceBackend {
        let mut mock = MockInferenceBackend::new();
        mock.expect_caption()
            .returning(|_, _| Ok("a man sitting at a desk".to_string()));
        mock.expect_generate()
            .returning(|req| Ok(format!("{} who dreamed of the sea.", req.inputs)));
        mock.expect_synthesize().returning(|_| {
            Ok(AudioPayload {
                bytes: b"fLaC\x00\x00\x00\x22".to_vec(),
                format: AudioFormat::Flac,
            })
        });
        mock
    }

    #[actix_web::test]
    async fn test_index_serves_page() {
        let temp = TempDir::new().unwrap();
        let state = app_state(MockInferenceBackend::new(), temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("phototale"));
        assert!(html.contains("image/jpeg,image/png"));
    }

    #[actix_web::test]
    async fn test_run_story_happy_path() {
        let temp = TempDir::new().unwrap();
        let state = app_state(happy_mock(), temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let (content_type, body) = multipart_image(JPEG_BYTES);
        let req = test::TestRequest::post()
            .uri("/api/story")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["caption"], "a man sitting at a desk");
        assert!(json["story"].as_str().unwrap().contains("dreamed of the sea"));
        assert_eq!(json["audio_url"], "/audio/story_audio.flac");
        assert!(json["completed_at"].as_str().is_some());

        assert!(temp.path().join("story_audio.flac").exists());
    }

    #[actix_web::test]
    async fn test_run_story_rejects_non_image() {
        let temp = TempDir::new().unwrap();
        let mut mock = MockInferenceBackend::new();
        mock.expect_caption().times(0);
        mock.expect_generate().times(0);
        mock.expect_synthesize().times(0);
        let state = app_state(mock, temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let (content_type, body) = multipart_image(b"plain text, not an image");
        let req = test::TestRequest::post()
            .uri("/api/story")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"]["type"], "invalid_upload");
    }

    #[actix_web::test]
    async fn test_run_story_maps_stage_failure_to_bad_gateway() {
        let temp = TempDir::new().unwrap();
        let mut mock = MockInferenceBackend::new();
        mock.expect_caption()
            .returning(|_, _| Err(BackendError::RequestFailed("Model too busy".to_string())));
        mock.expect_generate().times(0);
        mock.expect_synthesize().times(0);
        let state = app_state(mock, temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let (content_type, body) = multipart_image(JPEG_BYTES);
        let req = test::TestRequest::post()
            .uri("/api/story")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["error"]["type"], "pipeline_error");
    }

    #[actix_web::test]
    async fn test_serve_audio_returns_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("story_audio.flac"), b"fLaC").unwrap();
        let state = app_state(MockInferenceBackend::new(), temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/audio/story_audio.flac")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("content-type").unwrap(), "audio/flac");
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"fLaC");
    }

    #[actix_web::test]
    async fn test_serve_audio_missing_file_is_404() {
        let temp = TempDir::new().unwrap();
        let state = app_state(MockInferenceBackend::new(), temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/audio/nothing.flac")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_serve_audio_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let state = app_state(MockInferenceBackend::new(), temp.path());
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/audio/..%2Fsecret.txt")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
