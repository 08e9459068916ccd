use crate::config::{Config, Runtimes};
use crate::lang::Language;
use crate::types::{ExecutionRequest, ExecutionResult};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Child;
use tokio::{task, time};
use tracing::{debug, warn};

/// Exit code reported when the child is forcibly terminated on timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

const TIMEOUT_MESSAGE: &str = "Execution timed out.";

/// How long to wait for the capture tasks after a kill. Grandchildren may
/// keep the pipe open past the child's death.
const CAPTURE_GRACE: Duration = Duration::from_millis(100);

/// Runs one submission in an isolated child process.
///
/// Every outcome funnels into `ExecutionResult`: spawn failures, timeouts and
/// runtime failures never escape this boundary as errors.
pub struct Sandbox {
    workspace_root: PathBuf,
    runtimes: Runtimes,
}

/// The on-disk materialization of submitted source code, exclusively owned
/// by one in-flight execution. The directory is removed on every exit path;
/// removal failures are swallowed so they never mask the primary result.
struct Workspace {
    dir: PathBuf,
    src_path: PathBuf,
}

impl Workspace {
    fn create(root: &Path, src_name: &str, source_text: &str) -> Result<Self> {
        let dir = root.join(generate_name());
        fs::create_dir(&dir)
            .with_context(|| format!("failed to create workspace: path = {}", dir.display()))?;

        let src_path = dir.join(src_name);
        if let Err(err) = fs::write(&src_path, source_text) {
            let _ = fs::remove_dir_all(&dir);
            return Err(err).with_context(|| {
                format!("failed to materialize source: path = {}", src_path.display())
            });
        }

        Ok(Self { dir, src_path })
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

impl Sandbox {
    pub fn new(config: &Config) -> Result<Self> {
        let workspace_root = &config.executor.workspace_root;
        if !workspace_root.exists() {
            fs::create_dir_all(workspace_root).with_context(|| {
                format!(
                    "failed to create workspace root: path = {}",
                    workspace_root.display()
                )
            })?;
        }
        Ok(Self {
            workspace_root: workspace_root.clone(),
            runtimes: config.executor.runtimes.clone(),
        })
    }

    pub async fn execute(&self, lang: &dyn Language, request: &ExecutionRequest) -> ExecutionResult {
        match self.try_execute(lang, request).await {
            Ok(result) => result,
            Err(err) => {
                warn!("sandbox failure: {:#}", err);
                ExecutionResult {
                    stdout: String::new(),
                    stderr: format!("Error: {:#}", err),
                    exit_code: 1,
                    timed_out: false,
                }
            }
        }
    }

    async fn try_execute(
        &self,
        lang: &dyn Language,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult> {
        let workspace = Workspace::create(
            &self.workspace_root,
            lang.src_name(),
            &request.submission.source_text,
        )?;

        debug!(lang = lang.lang_name(), dir = %workspace.dir.display(), "spawning child");

        let mut cmd = lang.command(&self.runtimes, &workspace.src_path);
        cmd.current_dir(&workspace.dir);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().context("failed to spawn child process")?;

        let stdout = child.stdout.take().context("child stdout unavailable")?;
        let stderr = child.stderr.take().context("child stderr unavailable")?;
        let stdout_handle = task::spawn(read_to_end(stdout));
        let stderr_handle = task::spawn(read_to_end(stderr));

        if let Some(mut stdin) = child.stdin.take() {
            let payload = request.stdin_payload.clone().into_bytes();
            // On its own task: the pipe buffer is bounded and the child may
            // never consume its input. Write failures are the child's exit,
            // not ours.
            task::spawn(async move {
                let _ = stdin.write_all(&payload).await;
                let _ = stdin.shutdown().await;
            });
        }

        let status = tokio::select! {
            status = child.wait() => status.context("failed to wait for child process")?,
            _ = time::sleep(request.timeout) => {
                return Ok(kill_on_timeout(child, stdout_handle, stderr_handle).await);
            }
        };

        let stdout_bytes = stdout_handle
            .await
            .context("stdout capture task failed")??;
        let stderr_bytes = stderr_handle
            .await
            .context("stderr capture task failed")??;

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout_bytes).trim().to_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).trim().to_owned(),
            exit_code: status.code().unwrap_or(1),
            timed_out: false,
        })
    }
}

async fn kill_on_timeout(
    mut child: Child,
    mut stdout_handle: task::JoinHandle<std::io::Result<Vec<u8>>>,
    stderr_handle: task::JoinHandle<std::io::Result<Vec<u8>>>,
) -> ExecutionResult {
    let _ = child.kill().await;
    stderr_handle.abort();

    // Partial stdout captured before the forced termination is still
    // returned, never discarded.
    let stdout_bytes = match time::timeout(CAPTURE_GRACE, &mut stdout_handle).await {
        Ok(Ok(Ok(bytes))) => bytes,
        Ok(_) => Vec::new(),
        Err(_) => {
            stdout_handle.abort();
            Vec::new()
        }
    };

    ExecutionResult {
        stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
        stderr: TIMEOUT_MESSAGE.to_owned(),
        exit_code: TIMEOUT_EXIT_CODE,
        timed_out: true,
    }
}

async fn read_to_end<R>(mut reader: R) -> std::io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

fn generate_name() -> String {
    let timestamp = Utc::now().timestamp_nanos();
    let rng = rand::thread_rng().gen_range(0..1000);
    format!("{}-{:03}", timestamp, rng)
}
