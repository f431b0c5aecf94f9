//! CLI entry-point for journal mood timelines.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{cli::ScorerArgs, config::Settings, inference::timeline::read_entries};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV with `date` and `text` columns.
    pub input: PathBuf,
    /// Write the timeline as CSV here instead of printing JSON.
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub scorer: ScorerArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let entries = read_entries(&args.input)?;
    info!(entries = entries.len(), "scoring journal");
    let predictor = args.scorer.predictor(&settings)?;
    let timeline = predictor.timeline(&entries).await?;

    match &args.output {
        Some(path) => timeline.write_csv(path)?,
        None => println!("{}", serde_json::to_string_pretty(&timeline)?),
    }
    Ok(())
}
