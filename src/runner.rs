// src/runner.rs
//! Process spawning behind a narrow interface so the scanner's control flow
//! can be exercised without a real xray binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use crate::error::{Result, XrayError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Shell-quoted rendering, suitable for logs and reports.
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.to_string_lossy().into_owned());
        parts.extend(self.args.iter().cloned());
        // try_join only fails on NUL bytes
        shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// `None` when the child was terminated by a signal
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` to completion and capture both output streams.
    ///
    /// With `limit` set, a child still running at the deadline is killed and
    /// `XrayError::Timeout` is returned. A child that cannot be started at all
    /// yields `XrayError::Spawn`.
    async fn run(&self, command: &CommandLine, limit: Option<Duration>) -> Result<ProcessOutput>;
}

/// Runs commands as real child processes on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, command: &CommandLine, limit: Option<Duration>) -> Result<ProcessOutput> {
        debug!("Spawning: {}", command);

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| XrayError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        // Drain both pipes while waiting, a full pipe would stall the child
        let mut stdout_task = drain(child.stdout.take());
        let mut stderr_task = drain(child.stderr.take());

        // The deadline covers the pipes too: a grandchild can keep them open
        // after xray itself has exited.
        let outcome = {
            let finished = wait_and_collect(&mut child, &mut stdout_task, &mut stderr_task);
            match limit {
                None => Some(finished.await),
                Some(limit) => timeout(limit, finished).await.ok(),
            }
        };

        let Some(finished) = outcome else {
            let limit = limit.unwrap_or_default();
            warn!("{} still running after {:?}, killing it", program_name(&command.program), limit);
            if let Err(e) = child.kill().await {
                debug!("Kill failed: {}", e);
            }
            stdout_task.abort();
            stderr_task.abort();
            return Err(XrayError::Timeout(limit));
        };
        let (status, stdout, stderr) = finished?;

        debug!("{} exited with {:?}", program_name(&command.program), status.code());

        Ok(ProcessOutput {
            status: status.code(),
            stdout,
            stderr,
        })
    }
}

type Drained = JoinHandle<std::io::Result<Vec<u8>>>;

async fn wait_and_collect(
    child: &mut Child,
    stdout_task: &mut Drained,
    stderr_task: &mut Drained,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let status = child.wait().await?;
    let stdout = collect(stdout_task).await?;
    let stderr = collect(stderr_task).await?;
    Ok((status, stdout, stderr))
}

fn drain<R>(pipe: Option<R>) -> Drained
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

async fn collect(task: &mut Drained) -> Result<Vec<u8>> {
    let bytes = task.await.map_err(std::io::Error::other)??;
    Ok(bytes)
}

fn program_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
