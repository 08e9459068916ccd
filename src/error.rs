use reqwest::StatusCode;
use thiserror::Error;

/// Fatal errors: the invocation is reported with a nonzero process exit and
/// no execution is attempted. Failures inside the sandbox never surface here,
/// they are normalized into `ExecutionResult`.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("failed to fetch code: status = {0}")]
    FetchStatus(StatusCode),

    #[error("failed to fetch code: {0}")]
    FetchTransport(#[source] reqwest::Error),

    #[error("code body is too large: size = {size}, size_limit = {size_limit}")]
    BodyTooLarge { size: u64, size_limit: u64 },
}
