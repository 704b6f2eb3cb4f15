use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PredictionResult;

pub const DEFAULT_PREDICT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Body of a `/predict` reply. Both reply shapes share one JSON object, so
/// every field is optional here and [`PredictResponseBody::into_reply`] decides
/// which shape was sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictReply {
    Prediction(PredictionResult),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reply is missing `{0}`")]
pub struct MissingField(pub &'static str);

impl PredictResponseBody {
    pub fn into_reply(self) -> Result<PredictReply, MissingField> {
        // An empty error string does not count as an error reply.
        if let Some(error) = self.error.filter(|error| !error.is_empty()) {
            return Ok(PredictReply::Error(error));
        }
        let label = self.prediction.ok_or(MissingField("prediction"))?;
        let confidence = self.confidence.ok_or(MissingField("confidence"))?;
        Ok(PredictReply::Prediction(PredictionResult { label, confidence }))
    }
}
