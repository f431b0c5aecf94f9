//! CLI entry-point for serving the HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, cli::ScorerArgs, config::Settings};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (5001 for recurrent, 5000 for pretrained).
    #[arg(long)]
    pub port: Option<u16>,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[command(flatten)]
    pub scorer: ScorerArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let port = args.port.unwrap_or(args.scorer.backend.default_port());
    let predictor = args.scorer.predictor(&settings)?;
    api::serve(predictor, args.host, port).await
}
