// src/cli/handlers/transform.rs

use crate::{core::transformer, models::AppConfig};
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::borrow::Cow;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows how a snippet would be rewritten, without running it."
)]
struct TransformArgs {
    /// The PHP code to rewrite.
    code: String,
}

/// Main entry point for the `transform` command.
pub fn handle(args: Vec<String>, _config: &AppConfig) -> Result<()> {
    let transform_args = TransformArgs::try_parse_from(&args)?;

    match transformer::transform(&transform_args.code) {
        Cow::Owned(rewritten) => println!("{}", rewritten),
        Cow::Borrowed(original) => {
            println!("{}", original);
            eprintln!("{}", t!("transform.info.unchanged").dimmed());
        }
    }
    Ok(())
}
