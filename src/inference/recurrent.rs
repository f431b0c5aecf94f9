//! Scorer backed by the locally trained recurrent model.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use burn::prelude::*;
use tracing::info;

use crate::{
    inference::EmotionScorer,
    model::{ArtifactStore, EmotionModel, TrainedArtifacts},
    text::{normalize, Vocabulary},
};

pub struct RecurrentScorer<B: Backend> {
    forward: Arc<ForwardPass<B>>,
    labels: Vec<String>,
}

/// Everything one forward pass touches; shared with blocking worker threads.
struct ForwardPass<B: Backend> {
    // burn modules are Send but not Sync
    model: Mutex<EmotionModel<B>>,
    vocabulary: Vocabulary,
    device: B::Device,
}

impl<B: Backend> ForwardPass<B> {
    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let cleaned = normalize(text);
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = self
            .vocabulary
            .vectorize(&cleaned)
            .into_iter()
            .map(|id| id as i32)
            .collect();
        let length = ids.len();
        let input = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([1, length]);

        let model = self
            .model
            .lock()
            .map_err(|_| anyhow!("model lock poisoned"))?;
        model
            .forward_probabilities(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("reading probabilities: {e:?}"))
    }
}

impl<B: Backend> RecurrentScorer<B> {
    pub fn new(artifacts: TrainedArtifacts<B>, device: B::Device) -> Self {
        Self {
            labels: artifacts.labels.as_slice().to_vec(),
            forward: Arc::new(ForwardPass {
                model: Mutex::new(artifacts.model),
                vocabulary: artifacts.vocabulary,
                device,
            }),
        }
    }

    /// Load every artifact from `store`; fails if any is missing or inconsistent.
    pub fn load(store: &ArtifactStore, device: B::Device) -> Result<Self> {
        let artifacts = store.load::<B>(&device)?;
        info!(
            run_id = %artifacts.run_id,
            labels = artifacts.labels.len(),
            vocabulary = artifacts.vocabulary.len(),
            "recurrent scorer ready"
        );
        Ok(Self::new(artifacts, device))
    }

    /// Normalise, vectorise and run one forward pass on the calling thread.
    pub fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        self.forward.probabilities(text)
    }
}

#[async_trait]
impl<B: Backend> EmotionScorer for RecurrentScorer<B> {
    fn name(&self) -> &'static str {
        "recurrent"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    async fn score(&self, text: &str) -> Result<Vec<f32>> {
        let forward = Arc::clone(&self.forward);
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || forward.probabilities(&text))
            .await
            .context("forward pass panicked")?
    }
}
