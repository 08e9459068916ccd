use crate::config::{Config, InputMode};
use crate::error::WorkerError;

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Conventional fixture file name inside the configured directory.
pub const FIXTURE_FILE_NAME: &str = "input.txt";

/// Reserved delimiter joining logical lines in inline stdin and
/// expected-output values.
pub const INLINE_DELIMITER: char = '|';

/// Resolves the stdin payload from exactly one configured source.
///
/// Exactly one of the three modes is active per process. The payload is
/// resolved once, before the sandbox runs, and never re-read.
pub enum InputProvisioner {
    /// Read the conventional file from a fixture directory; a missing file
    /// yields empty stdin.
    Fixture { dir: PathBuf },
    /// Split a configured value on the reserved delimiter and rejoin the
    /// logical lines with `\n`.
    Inline { value: Option<String> },
    /// Read the process's own stdin to end-of-stream. The single-run
    /// sub-mode (`blocking = false`) performs no read at all.
    Piped { blocking: bool },
}

impl InputProvisioner {
    pub fn from_config(config: &Config) -> Result<Self, WorkerError> {
        let input = &config.input;
        match input.mode {
            InputMode::Fixture => {
                let dir = input
                    .fixture_dir
                    .clone()
                    .ok_or(WorkerError::MissingConfig("input.fixture_dir"))?;
                Ok(Self::Fixture { dir })
            }
            InputMode::Inline => Ok(Self::Inline {
                value: input.stdin.clone(),
            }),
            InputMode::Piped => Ok(Self::Piped {
                blocking: input.blocking,
            }),
        }
    }

    pub async fn resolve(&self) -> Result<String> {
        let payload = match self {
            Self::Fixture { dir } => {
                let path = dir.join(FIXTURE_FILE_NAME);
                match tokio::fs::read_to_string(&path).await {
                    Ok(content) => content,
                    Err(ref err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(err) => return Err(err.into()),
                }
            }
            Self::Inline { value } => match value {
                Some(value) => split_delimited(value).join("\n"),
                None => String::new(),
            },
            Self::Piped { blocking: false } => String::new(),
            Self::Piped { blocking: true } => read_piped(tokio::io::stdin()).await?,
        };

        debug!(len = payload.len(), "stdin payload resolved");
        Ok(payload)
    }
}

/// Reads the attached stream verbatim until end-of-stream.
async fn read_piped<R>(mut reader: R) -> Result<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = String::new();
    reader.read_to_string(&mut buf).await?;
    Ok(buf)
}

pub fn split_delimited(value: &str) -> Vec<String> {
    value
        .split(INLINE_DELIMITER)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[tokio::test]
    async fn inline_splits_on_delimiter() {
        let p = InputProvisioner::Inline {
            value: Some("1|2|3".to_owned()),
        };
        assert_eq!(p.resolve().await.unwrap(), "1\n2\n3");
    }

    #[tokio::test]
    async fn inline_absent_value_is_empty() {
        let p = InputProvisioner::Inline { value: None };
        assert_eq!(p.resolve().await.unwrap(), "");
    }

    #[tokio::test]
    async fn fixture_missing_file_is_empty() {
        let dir = std::env::temp_dir().join("exec-worker-test-no-fixture");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let p = InputProvisioner::Fixture { dir: dir.clone() };
        assert_eq!(p.resolve().await.unwrap(), "");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn fixture_reads_conventional_file() {
        let dir = std::env::temp_dir().join("exec-worker-test-fixture");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FIXTURE_FILE_NAME), "3\n4").unwrap();

        let p = InputProvisioner::Fixture { dir: dir.clone() };
        assert_eq!(p.resolve().await.unwrap(), "3\n4");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn piped_single_run_tolerates_missing_stream() {
        let p = InputProvisioner::Piped { blocking: false };
        assert_eq!(p.resolve().await.unwrap(), "");
    }

    #[tokio::test]
    async fn piped_batch_reads_stream_verbatim() {
        assert_eq!(read_piped(&b"3\n4"[..]).await.unwrap(), "3\n4");
        assert_eq!(read_piped(&b""[..]).await.unwrap(), "");
    }
}
