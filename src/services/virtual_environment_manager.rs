use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::models::virtual_environment::VirtualEnvironment;
use crate::utils::error::{HarnessError, Result};

/// Interpreters tried, in order, when none is configured
const PYTHON_CANDIDATES: &[&str] = &["python3", "python", "python3.12", "python3.11", "python3.10"];

/// Creates the throwaway virtual environments each test case runs in
#[derive(Debug, Clone, Default)]
pub struct VirtualEnvironmentManager {
    /// Interpreter to create environments with; auto-detected when unset
    python: Option<String>,
}

/// Information about a Python installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonInfo {
    /// Command or path used to invoke the interpreter
    pub executable: PathBuf,
    /// Python version
    pub version: String,
}

impl VirtualEnvironmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific interpreter instead of searching `PATH`
    pub fn with_python(python: Option<String>) -> Self {
        Self { python }
    }

    /// Create a fresh virtual environment at `venv_path`
    pub async fn create(&self, venv_path: &Path) -> Result<VirtualEnvironment> {
        if fs::try_exists(venv_path).await? {
            return Err(HarnessError::Venv(format!(
                "Virtual environment already exists at: {}",
                venv_path.display()
            )));
        }
        if let Some(parent) = venv_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let python_info = self.find_python_executable().await?;
        debug!(
            python = %python_info.executable.display(),
            version = %python_info.version,
            "creating virtual environment"
        );

        let output = Command::new(&python_info.executable)
            .arg("-m")
            .arg("venv")
            .arg(venv_path)
            .output()
            .await
            .map_err(|source| HarnessError::Spawn {
                command: format!("{} -m venv", python_info.executable.display()),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::Venv(format!(
                "Virtual environment creation failed: {}",
                stderr.trim()
            )));
        }

        let mut venv = VirtualEnvironment::new(venv_path.to_path_buf());
        venv.python_version = Some(python_info.version);
        info!(path = %venv_path.display(), "created virtual environment");
        Ok(venv)
    }

    /// Find an interpreter with a working `venv` module
    pub async fn find_python_executable(&self) -> Result<PythonInfo> {
        if let Some(python) = &self.python {
            return get_python_info(python).await;
        }

        for name in PYTHON_CANDIDATES {
            if let Ok(info) = get_python_info(name).await {
                return Ok(info);
            }
        }

        Err(HarnessError::Venv(
            "No suitable Python executable found. Please install Python 3.8 or later.".to_string(),
        ))
    }
}

async fn get_python_info(python_cmd: &str) -> Result<PythonInfo> {
    let version_output = Command::new(python_cmd)
        .arg("--version")
        .output()
        .await
        .map_err(|_| HarnessError::Venv(format!("Python not found: {python_cmd}")))?;

    if !version_output.status.success() {
        return Err(HarnessError::Venv(format!(
            "Invalid Python executable: {python_cmd}"
        )));
    }

    let venv_check = Command::new(python_cmd)
        .args(["-c", "import venv"])
        .output()
        .await
        .map_err(|_| HarnessError::Venv("Failed to check venv module".to_string()))?;

    if !venv_check.status.success() {
        return Err(HarnessError::Venv(format!(
            "{python_cmd} has no venv module. Please install python3-venv or update Python."
        )));
    }

    Ok(PythonInfo {
        executable: PathBuf::from(python_cmd),
        version: parse_python_version(&version_output.stdout, &version_output.stderr),
    })
}

/// Extract the version from `python --version` output; Python 2 printed it to stderr
fn parse_python_version(stdout: &[u8], stderr: &[u8]) -> String {
    let raw = if stdout.is_empty() { stderr } else { stdout };
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    trimmed.strip_prefix("Python ").unwrap_or(trimmed).to_string()
}
