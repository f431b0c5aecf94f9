//! CLI entry-point for inspecting text normalisation.

use std::io::{self, BufRead};

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::text::normalize;

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to normalise; reads stdin line by line when omitted.
    pub text: Vec<String>,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    if !args.text.is_empty() {
        println!("{}", normalize(&args.text.join(" ")));
        return Ok(());
    }
    for line in io::stdin().lock().lines() {
        println!("{}", normalize(&line?));
    }
    Ok(())
}
