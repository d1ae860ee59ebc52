use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::credentials::application_default_token;
use super::{
    AnnotationService, AnnotatorConfig, BatchAnnotateImagesRequest, BatchAnnotateImagesResponse,
    Credentials,
};
use crate::common::{Result, RevelioError};

// Google API error envelope
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// `images:annotate` over HTTPS with JSON bodies.
pub struct VisionClient {
    client: Client,
    url: String,
    credentials: Credentials,
    adc_token: OnceCell<String>,
}

impl VisionClient {
    /// Discovers credentials from `config` and targets its endpoint.
    pub fn new(config: &AnnotatorConfig) -> Result<Self> {
        let credentials = Credentials::discover(config)?;
        Ok(Self::with_credentials(config.url(), credentials))
    }

    pub fn with_credentials(url: &str, credentials: Credentials) -> Self {
        log::debug!("Vision client configured: url={}, credentials={:?}", url, credentials);
        Self {
            client: Client::new(),
            url: url.to_string(),
            credentials,
            adc_token: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn bearer_token(&self) -> Result<&str> {
        self.adc_token
            .get_or_try_init(application_default_token)
            .await
            .map(String::as_str)
    }
}

impl AnnotationService for VisionClient {
    async fn annotate(
        &self,
        batch: &BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse> {
        let request = self.client.post(&self.url).json(batch);
        let request = match &self.credentials {
            Credentials::ApiKey(key) => request.query(&[("key", key.as_str())]),
            Credentials::AccessToken(token) => request.bearer_auth(token),
            Credentials::ApplicationDefault => request.bearer_auth(self.bearer_token().await?),
        };

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;
        log::debug!("Annotate responded {} with {} bytes", status, response_text.len());

        if !status.is_success() {
            return Err(RevelioError::Transport(format!(
                "{}: {}",
                status,
                service_error_message(&response_text)
            )));
        }

        serde_json::from_str::<BatchAnnotateImagesResponse>(&response_text).map_err(|e| {
            RevelioError::Transport(format!(
                "failed to parse response: {}. Raw response: {}",
                e, response_text
            ))
        })
    }
}

/// Pulls `error.message` out of a Google error body, falling back to the raw text.
fn service_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            if envelope.error.code != 0 {
                format!("{} (code {})", envelope.error.message, envelope.error.code)
            } else {
                envelope.error.message
            }
        }
        _ => body.trim().to_string(),
    }
}
