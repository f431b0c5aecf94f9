//! Dataset ingestion, label encoding and splitting.

pub mod dataset;
pub mod labels;
pub mod split;

pub use dataset::{load_examples, DatasetColumns, Example};
pub use labels::LabelSet;
