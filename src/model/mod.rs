//! Sequence model, training loop and artifact persistence (burn).
//!
//! Everything that touches burn tensors lives under this module; the text and
//! data layers stay plain Rust so they can be tested without a backend.

pub mod artifacts;
pub mod batcher;
pub mod metrics;
pub mod network;
pub mod trainer;

pub use artifacts::{ArtifactStore, TrainedArtifacts};
pub use network::{EmotionModel, EmotionModelConfig};

/// CPU backend used by the CLI and the HTTP server.
#[cfg(not(feature = "wgpu"))]
pub type InferenceBackend = burn::backend::NdArray;
#[cfg(feature = "wgpu")]
pub type InferenceBackend = burn::backend::Wgpu;

pub type TrainingBackend = burn::backend::Autodiff<InferenceBackend>;
