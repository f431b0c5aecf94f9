//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::inference::{JournalEntry, Prediction};

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// `None` for both a missing field and an explicit `null`.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub text: String,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineRequest {
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scorer: &'static str,
    pub labels: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
