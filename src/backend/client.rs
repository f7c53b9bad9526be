//! HTTP client for the hosted inference API.

use std::time::Duration;

use super::InferenceBackend;
use super::types::{
    ApiErrorBody, AudioFormat, AudioPayload, BackendError, CaptionCandidate, GenerateRequest,
    GeneratedSequence, ImageFormat, SpeakRequest,
};
use super::{CAPTION_MODEL, SPEECH_MODEL, STORY_MODEL};

/// Default public endpoint of the hosted inference API.
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co";

/// Per-call timeout. Cold models are loaded inside the request, which can
/// take well over a minute.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// HTTP-based inference client.
pub struct HttpBackend {
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Create a new HTTP client against the given endpoint.
    pub fn new(endpoint: &str, api_token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Get the endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{model}", self.endpoint)
    }

    /// Build a POST with the headers every model call carries.
    ///
    /// `x-wait-for-model` makes the serving side load a cold model inside
    /// this request instead of failing with a 503.
    fn post(&self, model: &str) -> reqwest::blocking::RequestBuilder {
        let mut builder = self
            .client
            .post(self.model_url(model))
            .timeout(REQUEST_TIMEOUT)
            .header("x-wait-for-model", "true");

        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, BackendError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized(format!("Status: {status}")));
        }

        if !status.is_success() {
            // The API reports failures as {"error": "..."} when it can.
            let message = response
                .json::<ApiErrorBody>()
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("Status: {status}"));
            return Err(BackendError::RequestFailed(message));
        }

        Ok(response)
    }
}

impl InferenceBackend for HttpBackend {
    fn caption(&self, image: &[u8], format: ImageFormat) -> Result<String, BackendError> {
        let response = self
            .post(CAPTION_MODEL)
            .header("content-type", format.mime())
            .body(image.to_vec())
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let response = Self::check_status(response)?;

        let candidates: Vec<CaptionCandidate> = response
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        candidates
            .into_iter()
            .next()
            .map(|c| c.generated_text)
            .ok_or_else(|| BackendError::InvalidResponse("No caption returned".to_string()))
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError> {
        let response = self
            .post(STORY_MODEL)
            .json(request)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let response = Self::check_status(response)?;

        let sequences: Vec<GeneratedSequence> = response
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        sequences
            .into_iter()
            .next()
            .map(|s| s.generated_text)
            .ok_or_else(|| BackendError::InvalidResponse("No sequence returned".to_string()))
    }

    fn synthesize(&self, request: &SpeakRequest) -> Result<AudioPayload, BackendError> {
        let response = self
            .post(SPEECH_MODEL)
            .json(request)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let response = Self::check_status(response)?;

        let format = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(AudioFormat::from_content_type)
            .unwrap_or(AudioFormat::Flac);

        let bytes = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(AudioPayload { bytes, format })
    }
}
