//! Domain errors surfaced by the training and serving pipeline.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// An emotions cell could not be parsed into a tag list.
    #[error("row {row}: malformed emotion tags {raw:?}: {reason}")]
    MalformedTags {
        row: usize,
        raw: String,
        reason: &'static str,
    },

    /// A tag was not part of the frozen label set.
    #[error("label {0:?} is not part of the frozen label set")]
    UnknownLabel(String),

    #[error("{}: missing column {column:?}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("no usable examples found under {}", .0.display())]
    EmptyDataset(PathBuf),

    /// Artifacts on disk were not produced by the same training run.
    #[error("artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// A training hyperparameter is outside its usable range.
    #[error("invalid training setting {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("scorer failure: {0}")]
    Scorer(String),
}
