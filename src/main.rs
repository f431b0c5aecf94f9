//! `emotion-lens` binary: train, score, chart and serve emotion predictions.

use anyhow::Result;
use emotion_lens::{cli::Cli, config::Settings, logging, text::NORMALIZER_VERSION};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing()?;
    let cli = Cli::parse();
    let settings = Settings::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        normalizer = NORMALIZER_VERSION,
        command = ?cli,
        "emotion-lens starting"
    );
    cli.dispatch(settings).await
}
