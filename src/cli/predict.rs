//! CLI entry-point for one-off predictions.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api::types::PredictResponse, cli::ScorerArgs, config::Settings};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to classify.
    pub text: String,
    #[command(flatten)]
    pub scorer: ScorerArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let predictor = args.scorer.predictor(&settings)?;
    let predictions = predictor.analyze(&args.text).await?;
    let response = PredictResponse {
        text: args.text,
        predictions,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
