//! CLI entry-point for training the recurrent model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::{Settings, TrainConfig},
    data::DatasetColumns,
    model::{ArtifactStore, TrainingBackend},
    pipeline,
};

/// Args for the `train` sub-command; unset flags fall back to the environment.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV file or directory of CSV files.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
    #[arg(long)]
    pub artifacts: Option<PathBuf>,
    #[arg(long)]
    pub epochs: Option<usize>,
    #[arg(long)]
    pub batch_size: Option<usize>,
    #[arg(long)]
    pub patience: Option<usize>,
    #[arg(long)]
    pub learning_rate: Option<f64>,
    #[arg(long)]
    pub max_words: Option<usize>,
    #[arg(long)]
    pub sequence_length: Option<usize>,
    #[arg(long)]
    pub validation_fraction: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Also write the JSON report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Args {
    fn train_config(&self, base: &TrainConfig) -> TrainConfig {
        TrainConfig {
            max_words: self.max_words.unwrap_or(base.max_words),
            sequence_length: self.sequence_length.unwrap_or(base.sequence_length),
            embedding_dim: base.embedding_dim,
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            epochs: self.epochs.unwrap_or(base.epochs),
            patience: self.patience.unwrap_or(base.patience),
            learning_rate: self.learning_rate.unwrap_or(base.learning_rate),
            validation_fraction: self.validation_fraction.unwrap_or(base.validation_fraction),
            seed: self.seed.unwrap_or(base.seed),
        }
    }
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let cfg = args.train_config(&settings.train);
    let dataset = args.dataset.clone().unwrap_or(settings.dataset_path.clone());
    let store = ArtifactStore::new(args.artifacts.clone().unwrap_or(settings.artifacts_dir.clone()));
    let columns = DatasetColumns {
        text: settings.text_column.clone(),
        emotions: settings.emotions_column.clone(),
    };
    info!(?cfg, dataset = %dataset.display(), "starting training");

    let report = tokio::task::spawn_blocking(move || {
        pipeline::train_from_dataset::<TrainingBackend>(
            &dataset,
            &columns,
            &cfg,
            &store,
            &Default::default(),
        )
    })
    .await
    .context("training task panicked")??;

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &args.report {
        std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
    }
    println!("{json}");
    Ok(())
}
