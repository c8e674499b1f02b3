//! Hallbook - Meeting hall booking client
//!
//! Command line front end over the hall booking REST API.

use clap::Parser;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use hallbook_client::{
    cli::{self, Cli},
    config::{AppConfig, LoggingConfig},
    error::ErrorCode,
    AppError, AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Everything that logs happens here, so the file writer is flushed when this returns
async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    let _guard = init_tracing(&config.logging).map_err(|e| AppError::Config(e.to_string()))?;
    tracing::debug!("hallbook v{} against {}", env!("CARGO_PKG_VERSION"), config.backend.base_url);

    let state = AppState::new(config)?;
    cli::run(&state, cli.command).await.inspect_err(|e| {
        tracing::debug!("Command failed: {}", e);
    })
}

/// Console logging on stderr, plus a daily rolling file when a directory is configured
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hallbook_client={}", logging.level).into());

    let console = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let (file, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "hallbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    Ok(guard)
}

/// Process exit status of a failed command; never zero
fn exit_code(error: &AppError) -> u8 {
    match error.code() {
        ErrorCode::Success => ErrorCode::Failure as u8,
        code => code as u8,
    }
}
