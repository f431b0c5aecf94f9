//! Scorer that delegates to a hosted GoEmotions text-classification model.
//!
//! The endpoint speaks the Hugging Face inference protocol: `POST {"inputs": text}`
//! answered by `[[{"label": ..., "score": ...}, ...]]`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{config::Settings, data::LabelSet, error::Error, inference::EmotionScorer};

/// GoEmotions label order of the default endpoint.
pub const GO_EMOTIONS_LABELS: [&str; 28] = [
    "admiration",
    "amusement",
    "anger",
    "annoyance",
    "approval",
    "caring",
    "confusion",
    "curiosity",
    "desire",
    "disappointment",
    "disapproval",
    "disgust",
    "embarrassment",
    "excitement",
    "fear",
    "gratitude",
    "grief",
    "joy",
    "love",
    "nervousness",
    "optimism",
    "pride",
    "realization",
    "relief",
    "remorse",
    "sadness",
    "surprise",
    "neutral",
];

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    parameters: ClassifyParameters,
    options: ClassifyOptions,
}

#[derive(Debug, Serialize)]
struct ClassifyParameters {
    top_k: usize,
    /// One distribution over all labels rather than independent sigmoids.
    function_to_apply: &'static str,
}

#[derive(Debug, Serialize)]
struct ClassifyOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Batched(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Self::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Single(scores) => scores,
        }
    }
}

pub struct PretrainedScorer {
    client: Client,
    endpoint: String,
    token: Option<String>,
    labels: LabelSet,
}

impl PretrainedScorer {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("emotion-lens/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(60))
            .build()?;
        let endpoint = endpoint.into();
        info!(%endpoint, "pretrained scorer ready");
        Ok(Self {
            client,
            endpoint,
            token,
            labels: LabelSet::from_ordered(
                GO_EMOTIONS_LABELS.iter().map(|l| l.to_string()).collect(),
            ),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.pretrained_endpoint.clone(),
            settings.pretrained_token.clone(),
        )
    }

    /// Spread the endpoint's `(label, score)` pairs over the fixed label order.
    fn align(&self, scores: Vec<LabelScore>) -> Vec<f32> {
        let mut probabilities = vec![0.0; self.labels.len()];
        for LabelScore { label, score } in scores {
            match self.labels.index_of(&label) {
                Some(index) => probabilities[index] = score,
                None => debug!(%label, "ignoring label outside GoEmotions"),
            }
        }
        probabilities
    }
}

#[async_trait]
impl EmotionScorer for PretrainedScorer {
    fn name(&self) -> &'static str {
        "pretrained"
    }

    fn labels(&self) -> &[String] {
        self.labels.as_slice()
    }

    async fn score(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let body = ClassifyRequest {
            inputs: text,
            parameters: ClassifyParameters {
                top_k: self.labels.len(),
                function_to_apply: "softmax",
            },
            options: ClassifyOptions {
                wait_for_model: true,
            },
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("calling {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let reason = format!("{} answered {status}: {detail}", self.endpoint);
            return Err(Error::Scorer(reason).into());
        }
        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| Error::Scorer(format!("unexpected response shape: {e}")))?;
        Ok(self.align(parsed.into_scores()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_batched_and_flat_payloads() {
        let batched: ClassifyResponse =
            serde_json::from_str(r#"[[{"label":"joy","score":0.9}]]"#).unwrap();
        let flat: ClassifyResponse =
            serde_json::from_str(r#"[{"label":"fear","score":0.2}]"#).unwrap();
        assert_eq!(batched.into_scores()[0].label, "joy");
        assert_eq!(flat.into_scores()[0].label, "fear");
    }

    #[test]
    fn aligns_scores_to_label_order() {
        let scorer = PretrainedScorer::new("http://localhost:9/unused", None).unwrap();
        let aligned = scorer.align(vec![
            LabelScore {
                label: "neutral".into(),
                score: 0.5,
            },
            LabelScore {
                label: "admiration".into(),
                score: 0.25,
            },
            LabelScore {
                label: "LABEL_99".into(),
                score: 0.9,
            },
        ]);
        assert_eq!(aligned.len(), 28);
        assert_eq!(aligned[0], 0.25);
        assert_eq!(aligned[27], 0.5);
        assert_eq!(aligned.iter().filter(|p| **p > 0.0).count(), 2);
    }
}
