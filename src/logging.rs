//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Our own events at `info`; the tensor, dataframe and HTTP stacks only when they warn.
pub const DEFAULT_FILTER: &str = "info,burn_core=warn,burn_ndarray=warn,polars=warn,hyper=warn,reqwest=warn";

/// `RUST_LOG` wins when it parses; anything else falls back to [`DEFAULT_FILTER`].
pub fn filter_from(directives: Option<&str>) -> Result<EnvFilter> {
    match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => Ok(filter),
        _ => Ok(EnvFilter::try_new(DEFAULT_FILTER)?),
    }
}

/// Install a global subscriber that writes to stderr, leaving stdout to command output.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .with_filter(filter_from(directives.as_deref())?);

    tracing_subscriber::registry().with(fmt_layer).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_broken_env_uses_default_filter() {
        let default = filter_from(None).unwrap().to_string();
        assert!(default.contains("burn_core"), "{default}");
        assert_eq!(filter_from(Some("emotion_lens=loudest")).unwrap().to_string(), default);
    }

    #[test]
    fn env_directives_replace_default() {
        let filter = filter_from(Some("emotion_lens=debug")).unwrap().to_string();
        assert_eq!(filter, "emotion_lens=debug");
    }
}
