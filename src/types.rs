use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One unit of user-provided source code, created once per request
/// from a fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub source_text: String,
    pub language: String,
    pub code_ref: String,
}

/// A submission combined with its resolved stdin payload.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub submission: Submission,
    pub stdin_payload: String,
    pub timeout: Duration,
}

/// Produced exactly once per sandbox call. Every sandbox-level failure
/// (spawn error, timeout, runtime failure) funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

/// Expected output, as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSpec {
    pub expected_lines: Vec<String>,
}

/// The classified outcome of one execution. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictReport {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub matched: Option<bool>,
    pub diff: Option<OutputDiff>,
}

/// Full expected and actual sequences, each in original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDiff {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}
