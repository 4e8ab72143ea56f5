// Common error types for install-matrix

use thiserror::Error;

use crate::models::installer_kind::InstallerKind;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid matrix file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A subprocess exited unsuccessfully. `code` is `None` when it was killed by a signal.
    #[error("`{command}` exited with {}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("{installer} setup failed: {message}")]
    SetupFailed {
        installer: InstallerKind,
        message: String,
    },

    #[error("{package} is not installed according to {installer}")]
    NotInstalled {
        installer: InstallerKind,
        package: String,
    },

    #[error("Unexpected JSON from installer: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Virtual environment error: {0}")]
    Venv(String),
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"))
}

impl HarnessError {
    /// Exit code of a failed subprocess, if this error came from one.
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }

    /// Captured output of a failed subprocess, for diagnostics.
    pub fn captured_output(&self) -> Option<(&str, &str)> {
        match self {
            Self::CommandFailed { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
