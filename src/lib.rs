#![deny(clippy::all)]

pub mod config;
mod error;
mod fetch;
mod input;
pub mod lang;
pub mod report;
pub mod sandbox;
pub mod telemetry;
pub mod types;
pub mod verdict;

pub use self::config::{CleanPolicy, Config, InputMode, Protocol};
pub use self::error::WorkerError;
pub use self::fetch::CodeFetcher;
pub use self::input::InputProvisioner;
pub use self::report::Rendered;
pub use self::sandbox::Sandbox;
pub use self::types::{ExecutionRequest, ExecutionResult, Submission, ValidationSpec};

use std::time::Duration;

use anyhow::Result;
use tracing::info;

/// Runs the whole pipeline for one submission:
/// fetch -> provision -> execute -> classify -> render.
///
/// Fatal errors (missing configuration, fetch failure) are returned as `Err`;
/// everything that happens inside the sandbox is normalized into the rendered
/// report instead.
pub async fn run(config: Config) -> Result<Rendered> {
    let lang = lang::select(&config.worker.language)
        .ok_or_else(|| WorkerError::UnsupportedLanguage(config.worker.language.clone()))?;

    let provisioner = InputProvisioner::from_config(&config)?;
    let validation = config.input.validation_spec();

    let fetcher = CodeFetcher::new(config.worker.download_size_limit.as_u64());
    let source_text = fetcher.fetch(&config.worker.code_ref).await?;

    let submission = Submission {
        source_text,
        language: config.worker.language.clone(),
        code_ref: config.worker.code_ref.clone(),
    };

    let stdin_payload = provisioner.resolve().await?;

    let request = ExecutionRequest {
        submission,
        stdin_payload,
        timeout: Duration::from_millis(config.worker.timeout_ms),
    };

    let sandbox = Sandbox::new(&config)?;
    let result = sandbox.execute(&*lang, &request).await;

    info!(
        exit_code = result.exit_code,
        timed_out = result.timed_out,
        "execution finished"
    );

    let verdict = verdict::classify(&result, validation.as_ref());
    let clean = verdict::is_clean(&result, config.report.clean_policy);

    Ok(report::render(config.report.protocol, &verdict, clean))
}
