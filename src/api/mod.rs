//! HTTP layer exposing emotion predictions and mood timelines.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::inference::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

/// Build the router around an already loaded predictor.
pub fn router(predictor: Arc<Predictor>) -> Router {
    Router::new()
        .route("/api/predict", post(routes::predict))
        .route("/api/timeline", post(routes::timeline))
        .route("/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { predictor })
}

pub async fn serve(predictor: Arc<Predictor>, host: String, port: u16) -> Result<()> {
    let scorer = predictor.scorer_name();
    let router = router(predictor);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, scorer, "serving emotion-lens API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
