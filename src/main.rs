//! scriba - CLI entry point.
//!
//! Takes no flags or arguments: every run issues the same review instruction
//! for the current directory and streams the generated review to stdout.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use scriba::agent::prompt::REVIEW_PROMPT;
use scriba::agent::{AnthropicClient, run_agent};
use scriba::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let client = AnthropicClient::new(&config);

    // Bounded relay: the client produces text chunks, this task prints them
    // as they arrive.
    let (tx, mut rx) = mpsc::channel::<String>(32);
    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(chunk) = rx.recv().await {
            if stdout.write_all(chunk.as_bytes()).is_err() {
                break;
            }
            let _ = stdout.flush();
        }
    });

    run_agent(&client, &config, REVIEW_PROMPT, tx)
        .await
        .context("Review generation failed")?;

    printer.await.context("Output task failed")?;
    println!();

    Ok(())
}
