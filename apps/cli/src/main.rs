//! Bleacher CLI — weekly NFL team briefs.
//!
//! Collects headlines and subreddit chatter, has an LLM distill them into a
//! validated report, and renders it as a self-contained HTML page.

mod commands;

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
