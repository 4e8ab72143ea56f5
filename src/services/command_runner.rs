use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::models::virtual_environment::VirtualEnvironment;
use crate::utils::error::{HarnessError, Result};

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Runs an installer tool by name.
///
/// A non-zero exit is reported as [`HarnessError::CommandFailed`] carrying the
/// exit code and whatever the tool printed.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, tool: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs tools installed in a virtual environment through that environment's interpreter
#[derive(Debug, Clone)]
pub struct VenvCommandRunner {
    venv: VirtualEnvironment,
    working_dir: PathBuf,
    env_vars: HashMap<String, OsString>,
}

impl VenvCommandRunner {
    pub fn new(venv: VirtualEnvironment, working_dir: impl Into<PathBuf>) -> Self {
        let mut env_vars = venv.activation_env();
        // pipenv warns about running inside an outer virtualenv otherwise
        env_vars.insert("PIPENV_VERBOSITY".to_string(), OsString::from("-1"));

        Self {
            venv,
            working_dir: working_dir.into(),
            env_vars,
        }
    }

    /// Set an extra environment variable for every command
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn env_var(&self, key: &str) -> Option<&OsString> {
        self.env_vars.get(key)
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The program and leading arguments used to invoke `tool`
    pub fn invocation(&self, tool: &str) -> (PathBuf, PathBuf) {
        (self.venv.python(), self.venv.script(tool))
    }
}

#[async_trait]
impl CommandRunner for VenvCommandRunner {
    async fn run(&self, tool: &str, args: &[String]) -> Result<CommandOutput> {
        let (python, script) = self.invocation(tool);
        let command_line = display_command(tool, args);
        debug!(command = %command_line, cwd = %self.working_dir.display(), "running");

        let output = Command::new(&python)
            .arg(&script)
            .args(args)
            .current_dir(&self.working_dir)
            .envs(&self.env_vars)
            .env_remove("PYTHONHOME")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| HarnessError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(HarnessError::CommandFailed {
                command: command_line,
                code: output.status.code(),
                stdout,
                stderr,
            })
        }
    }
}

/// Human-readable form of a tool invocation, used in logs and errors
pub fn display_command(tool: &str, args: &[String]) -> String {
    std::iter::once(tool)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
