//! emotion-lens: multi-label emotion classification for short texts.
//!
//! The binary wires these modules into a CLI; integration tests drive them
//! directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod text;

pub use error::{Error, Result};
