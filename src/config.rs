//! Runtime configuration utilities for emotion-lens.

use std::{env, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default hosted endpoint for the pretrained GoEmotions classifier.
pub const DEFAULT_PRETRAINED_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/SamLowe/roberta-base-go_emotions";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// CSV file or directory of CSV files with labeled examples.
    pub dataset_path: PathBuf,
    /// Directory holding weights, vocabulary and labels.
    pub artifacts_dir: PathBuf,
    pub text_column: String,
    pub emotions_column: String,
    /// Model-serving endpoint for the pretrained classifier.
    pub pretrained_endpoint: String,
    /// Bearer token sent to the pretrained endpoint, if any.
    pub pretrained_token: Option<String>,
    pub train: TrainConfig,
}

/// Hyperparameters of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Vocabulary cap, padding and OOV ids included.
    pub max_words: usize,
    pub sequence_length: usize,
    pub embedding_dim: usize,
    pub batch_size: usize,
    pub epochs: usize,
    /// Epochs without validation-loss improvement before stopping.
    pub patience: usize,
    pub learning_rate: f64,
    pub validation_fraction: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_words: 10_000,
            sequence_length: 100,
            embedding_dim: 128,
            batch_size: 64,
            epochs: 10,
            patience: 3,
            learning_rate: 1e-3,
            validation_fraction: 0.2,
            seed: 42,
        }
    }
}

impl TrainConfig {
    /// Reject values that would panic or silently misbehave during training.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field, reason: String| Err(Error::InvalidConfig { field, reason });

        // ids 0 and 1 are reserved for padding and OOV
        if self.max_words < 3 {
            return invalid("max_words", format!("{} leaves no room for words", self.max_words));
        }
        for (field, value) in [
            ("sequence_length", self.sequence_length),
            ("embedding_dim", self.embedding_dim),
            ("batch_size", self.batch_size),
            ("epochs", self.epochs),
        ] {
            if value == 0 {
                return invalid(field, "must be at least 1".into());
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return invalid(
                "learning_rate",
                format!("{} is not a positive number", self.learning_rate),
            );
        }
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return invalid(
                "validation_fraction",
                format!("{} is outside (0, 1)", self.validation_fraction),
            );
        }
        Ok(())
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = TrainConfig::default();
        let train = TrainConfig {
            max_words: env_or("MAX_WORDS", defaults.max_words),
            sequence_length: env_or("SEQUENCE_LENGTH", defaults.sequence_length),
            embedding_dim: env_or("EMBEDDING_DIM", defaults.embedding_dim),
            batch_size: env_or("BATCH_SIZE", defaults.batch_size),
            epochs: env_or("EPOCHS", defaults.epochs),
            patience: env_or("PATIENCE", defaults.patience),
            learning_rate: env_or("LEARNING_RATE", defaults.learning_rate),
            validation_fraction: env_or("VALIDATION_FRACTION", defaults.validation_fraction),
            seed: env_or("SEED", defaults.seed),
        };

        Ok(Self {
            dataset_path: env::var("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/emotions.csv")),
            artifacts_dir: env::var("ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./artifacts")),
            text_column: env::var("TEXT_COLUMN").unwrap_or_else(|_| "text".to_string()),
            emotions_column: env::var("EMOTIONS_COLUMN")
                .unwrap_or_else(|_| "emotions".to_string()),
            pretrained_endpoint: env::var("PRETRAINED_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_PRETRAINED_ENDPOINT.to_string()),
            pretrained_token: env::var("PRETRAINED_TOKEN").ok().filter(|t| !t.is_empty()),
            train,
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_field(cfg: TrainConfig) -> &'static str {
        match cfg.validate() {
            Err(Error::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        TrainConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let base = TrainConfig::default();
        let cases = [
            (TrainConfig { sequence_length: 0, ..base.clone() }, "sequence_length"),
            (TrainConfig { embedding_dim: 0, ..base.clone() }, "embedding_dim"),
            (TrainConfig { batch_size: 0, ..base.clone() }, "batch_size"),
            (TrainConfig { epochs: 0, ..base.clone() }, "epochs"),
            (TrainConfig { max_words: 2, ..base.clone() }, "max_words"),
        ];
        for (cfg, field) in cases {
            assert_eq!(rejected_field(cfg), field);
        }
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let base = TrainConfig::default();
        for fraction in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let cfg = TrainConfig { validation_fraction: fraction, ..base.clone() };
            assert_eq!(rejected_field(cfg), "validation_fraction");
        }
        for rate in [0.0, -1e-3, f64::INFINITY] {
            let cfg = TrainConfig { learning_rate: rate, ..base.clone() };
            assert_eq!(rejected_field(cfg), "learning_rate");
        }
    }
}
