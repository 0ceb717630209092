//! Binary crate for the `weather-finder` tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and the location permission prompt
//! - The terminal weather screen and plain-text output

use clap::Parser;

mod app;
mod cli;
mod input;
mod logging;
mod prompt;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
