//! Inference: thresholded emotion predictions and mood timelines.

pub mod pretrained;
pub mod recurrent;
pub mod timeline;

use std::{cmp::Ordering, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

pub use pretrained::PretrainedScorer;
pub use recurrent::RecurrentScorer;
pub use timeline::{JournalEntry, MoodTimeline};

/// Labels must score strictly above this to be reported.
pub const PREDICTION_THRESHOLD: f32 = 0.3;

/// Anything that turns text into one probability per label.
#[async_trait]
pub trait EmotionScorer: Send + Sync {
    /// Short identifier reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// Output labels, index-aligned with [`score`](Self::score).
    fn labels(&self) -> &[String];

    /// Per-label probabilities, or an empty vector when the text has
    /// nothing to score.
    async fn score(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Keep labels above `threshold`, highest first, scores rounded to 3 places.
pub fn select(labels: &[String], probabilities: &[f32], threshold: f32) -> Vec<Prediction> {
    let mut kept: Vec<(&String, f32)> = labels
        .iter()
        .zip(probabilities.iter().copied())
        .filter(|(_, p)| *p > threshold)
        .collect();
    kept.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    kept.into_iter()
        .map(|(label, p)| Prediction {
            label: label.clone(),
            score: round3(p),
        })
        .collect()
}

fn round3(p: f32) -> f64 {
    (f64::from(p) * 1000.0).round() / 1000.0
}

/// Serving component: one immutable scorer plus the reporting threshold.
#[derive(Clone)]
pub struct Predictor {
    scorer: Arc<dyn EmotionScorer>,
    threshold: f32,
}

impl Predictor {
    pub fn new(scorer: Arc<dyn EmotionScorer>) -> Self {
        Self {
            scorer,
            threshold: PREDICTION_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    pub fn labels(&self) -> &[String] {
        self.scorer.labels()
    }

    /// Labels whose probability exceeds the threshold for `text`.
    pub async fn analyze(&self, text: &str) -> Result<Vec<Prediction>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let probabilities = self.scorer.score(text).await?;
        if probabilities.is_empty() {
            debug!("nothing to score after normalisation");
            return Ok(Vec::new());
        }
        let labels = self.scorer.labels();
        if probabilities.len() != labels.len() {
            return Err(Error::Scorer(format!(
                "{} returned {} probabilities for {} labels",
                self.scorer.name(),
                probabilities.len(),
                labels.len()
            ))
            .into());
        }
        Ok(select(labels, &probabilities, self.threshold))
    }

    /// Classify each entry independently and assemble a sparse timeline.
    pub async fn timeline(&self, entries: &[JournalEntry]) -> Result<MoodTimeline> {
        let mut scored = Vec::with_capacity(entries.len());
        for entry in entries {
            scored.push((entry.date, self.analyze(&entry.text).await?));
        }
        Ok(MoodTimeline::from_predictions(scored))
    }
}
