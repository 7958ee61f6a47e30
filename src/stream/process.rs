//! External process seam
//!
//! Everything that spawns the player or the downloader goes through
//! [`ProcessRunner`], so format ordering and fallback can be exercised
//! without launching real programs.

use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// How the child's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Share the terminal (stdin, stdout, stderr) so the player stays interactive
    #[default]
    Inherit,
    /// Show output but keep the child off our stdin
    OutputOnly,
}

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdio: StdioMode,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdio: StdioMode::Inherit,
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

    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status of a finished child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Errors from running an external program
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' failed with {outcome}")]
    Failed {
        program: String,
        outcome: ExitOutcome,
    },
}

/// Runs an invocation to completion
#[async_trait(?Send)]
pub trait ProcessRunner {
    /// Spawn the program and wait for it to exit
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ExitOutcome>;

    /// Like [`run`](Self::run), but a non-zero exit is an error
    async fn run_checked(&self, invocation: &Invocation) -> Result<(), ProcessError> {
        let outcome = self
            .run(invocation)
            .await
            .map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if outcome.is_success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                program: invocation.program.clone(),
                outcome,
            })
        }
    }
}

/// Spawns real child processes with tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait(?Send)]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ExitOutcome> {
        tracing::debug!(command = %invocation, "spawning");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        match invocation.stdio {
            StdioMode::Inherit => {
                cmd.stdin(Stdio::inherit());
            }
            StdioMode::OutputOnly => {
                cmd.stdin(Stdio::null());
            }
        }
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        let status = cmd.status().await?;
        Ok(status.into())
    }
}

/// Check whether a program can be found and executed
///
/// Paths are checked directly, bare names are looked up in `PATH`.
pub fn is_on_path(program: &str) -> bool {
    which::which(program).is_ok()
}
