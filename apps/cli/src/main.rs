//! Nova-Infor CLI — academic guidance chat for Computer Engineering students.
//!
//! Answers from interview transcripts when a stored question matches, and
//! falls back to an OpenAI-compatible model otherwise.

mod chat;
mod commands;
mod display;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
