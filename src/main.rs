//! `htmlport-worker`: serve parse requests over stdin/stdout.
//!
//! Stdout carries only framed responses; logs go to stderr. The process exits
//! with status 0 when stdin closes between messages and 1 on any fatal error.

use std::process::ExitCode;

use htmlport::config::{DEFAULT_LOG_FILTER, ENV_LOG};
use htmlport::{Html5everParser, WorkerBuilder, WorkerConfig};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    let config = WorkerConfig::from_env();
    tracing::debug!(?config, "Starting worker");

    let mut worker = config
        .apply(WorkerBuilder::new())
        .build(Html5everParser::new());

    match worker
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
