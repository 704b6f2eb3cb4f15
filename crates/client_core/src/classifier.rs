use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{
    MissingField, PredictReply, PredictRequest, PredictResponseBody, DEFAULT_PREDICT_ENDPOINT,
};
use url::Url;

use crate::error::ClassifyError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends one piece of text to the emotion classifier.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<PredictReply, ClassifyError>;
}

pub struct HttpClassifier {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ClassifyError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClassifyError::Client)?;
        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    pub fn with_default_endpoint() -> Result<Self, ClassifyError> {
        Self::new(Url::parse(DEFAULT_PREDICT_ENDPOINT)?, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_error(&self, err: reqwest::Error) -> ClassifyError {
        if err.is_timeout() {
            ClassifyError::Timeout(self.timeout)
        } else {
            ClassifyError::Request(err)
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<PredictReply, ClassifyError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&PredictRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|err| self.request_error(err))?;

        // The service reports application errors with a 4xx/5xx status and a
        // JSON body, so the body is decoded regardless of status.
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.request_error(err))?;
        let body: PredictResponseBody = serde_json::from_slice(&bytes)
            .map_err(|source| ClassifyError::MalformedBody { status, source })?;
        body.into_reply()
            .map_err(|MissingField(field)| ClassifyError::MissingField { status, field })
    }
}
