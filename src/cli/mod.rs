//! Command-line interface wiring for emotion-lens.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::{
    config::Settings,
    inference::{EmotionScorer, PretrainedScorer, Predictor, RecurrentScorer},
    model::{ArtifactStore, InferenceBackend},
};

pub mod normalize;
pub mod predict;
pub mod serve;
pub mod timeline;
pub mod train;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-label emotion classifier", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Train(args) => train::run(args, settings).await,
            Commands::Predict(args) => predict::run(args, settings).await,
            Commands::Timeline(args) => timeline::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Normalize(args) => normalize::run(args).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Train the recurrent model and write its artifacts.
    Train(train::Args),
    /// Classify a single text.
    Predict(predict::Args),
    /// Build a mood timeline from a `date,text` journal CSV.
    Timeline(timeline::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
    /// Print the normalised form of the given text.
    Normalize(normalize::Args),
}

/// Which model answers predictions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ScorerKind {
    /// Locally trained bidirectional LSTM.
    #[default]
    Recurrent,
    /// Hosted GoEmotions transformer.
    Pretrained,
}

impl ScorerKind {
    pub fn default_port(self) -> u16 {
        match self {
            Self::Recurrent => 5001,
            Self::Pretrained => 5000,
        }
    }
}

/// Scorer selection shared by every inference command.
#[derive(Debug, Clone, ClapArgs)]
pub struct ScorerArgs {
    #[arg(long, value_enum, default_value_t = ScorerKind::Recurrent)]
    pub backend: ScorerKind,
    /// Artifacts directory (defaults to ARTIFACTS_DIR).
    #[arg(long)]
    pub artifacts: Option<PathBuf>,
    /// Override the reporting threshold.
    #[arg(long)]
    pub threshold: Option<f32>,
}

impl ScorerArgs {
    /// Load the selected scorer once and wrap it in a predictor.
    pub fn predictor(&self, settings: &Settings) -> Result<Arc<Predictor>> {
        let scorer: Arc<dyn EmotionScorer> = match self.backend {
            ScorerKind::Recurrent => {
                let dir = self
                    .artifacts
                    .clone()
                    .unwrap_or_else(|| settings.artifacts_dir.clone());
                Arc::new(RecurrentScorer::<InferenceBackend>::load(
                    &ArtifactStore::new(dir),
                    Default::default(),
                )?)
            }
            ScorerKind::Pretrained => Arc::new(PretrainedScorer::from_settings(settings)?),
        };
        let mut predictor = Predictor::new(scorer);
        if let Some(threshold) = self.threshold {
            predictor = predictor.with_threshold(threshold);
        }
        Ok(Arc::new(predictor))
    }
}
