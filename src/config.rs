use crate::types::ValidationSpec;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use ubyte::{ByteUnit, ToByteUnit};
use validator::Validate;

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Config {
    #[validate]
    pub worker: Worker,

    #[validate]
    pub executor: Executor,

    pub input: Input,

    #[serde(default)]
    pub report: Report,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Worker {
    #[validate(length(min = 1))]
    pub code_ref: String,

    #[validate(length(min = 1))]
    pub language: String,

    #[validate(range(min = 100, max = 60000))]
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_download_size_limit")]
    pub download_size_limit: ByteUnit,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Executor {
    pub workspace_root: PathBuf,

    #[serde(default)]
    pub runtimes: Runtimes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runtimes {
    #[serde(default = "default_python")]
    pub python: PathBuf,

    #[serde(default = "default_node")]
    pub node: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    pub mode: InputMode,

    /// Directory holding the conventional `input.txt` fixture.
    pub fixture_dir: Option<PathBuf>,

    /// Stdin lines joined by the reserved `|` delimiter.
    pub stdin: Option<String>,

    /// Expected output lines joined by the reserved `|` delimiter.
    pub expected: Option<String>,

    /// Piped sub-mode: `true` blocks on the attached stream until EOF,
    /// `false` (single-run) performs no read at all.
    #[serde(default)]
    pub blocking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Fixture,
    Inline,
    Piped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub protocol: Protocol,

    #[serde(default)]
    pub clean_policy: CleanPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Verbose,
    Terse,
}

/// Whether diagnostic output on stderr disqualifies an otherwise
/// successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanPolicy {
    Strict,
    ExitCodeOnly,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config> {
        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

impl Input {
    pub fn validation_spec(&self) -> Option<ValidationSpec> {
        let expected = self.expected.as_deref()?;
        // An empty value expects empty output, not a single empty line.
        let expected_lines = if expected.is_empty() {
            Vec::new()
        } else {
            crate::input::split_delimited(expected)
        };
        Some(ValidationSpec { expected_lines })
    }
}

impl Default for Runtimes {
    fn default() -> Self {
        Self {
            python: default_python(),
            node: default_node(),
        }
    }
}

impl Default for Report {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            clean_policy: CleanPolicy::default(),
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::Terse
    }
}

impl Default for CleanPolicy {
    fn default() -> Self {
        CleanPolicy::Strict
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_download_size_limit() -> ByteUnit {
    4.mebibytes()
}

fn default_python() -> PathBuf {
    PathBuf::from("python3")
}

fn default_node() -> PathBuf {
    PathBuf::from("node")
}
