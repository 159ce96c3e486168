//! External command execution
//!
//! Every git and generator invocation goes through the [`CommandRunner`]
//! trait so the release pipeline can be driven against a recording double in
//! tests. The system implementation inherits stdio, letting git and the
//! generator write straight to the job log.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

/// A single external command with its arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
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
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Error types for command execution
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start `{invocation}`")]
    Spawn {
        invocation: Invocation,
        #[source]
        source: std::io::Error,
    },

    #[error("`{invocation}` failed ({})", describe_exit(.code))]
    Failed {
        invocation: Invocation,
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Trait for running external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and wait for it, failing on a non-zero exit
    async fn run(&self, invocation: &Invocation) -> Result<(), RunnerError>;
}

/// Runs commands as child processes of this one
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), RunnerError> {
        debug!(cwd = %invocation.cwd.display(), "Spawning {}", invocation);

        let status = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .await
            .map_err(|source| RunnerError::Spawn {
                invocation: invocation.clone(),
                source,
            })?;

        if !status.success() {
            error!("Command `{}` returned {}", invocation, status);
            return Err(RunnerError::Failed {
                invocation: invocation.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
