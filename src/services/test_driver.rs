// Runs the installers × extras matrix

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{error, info, warn};

use crate::models::install_request::InstallRequest;
use crate::models::installer_kind::InstallerKind;
use crate::models::test_case::{CaseOutcome, MatrixReport, TestCase};
use crate::models::virtual_environment::VirtualEnvironment;
use crate::services::command_runner::{CommandRunner, VenvCommandRunner};
use crate::services::installers::build_installer;
use crate::services::virtual_environment_manager::VirtualEnvironmentManager;
use crate::utils::config::{MatrixConfig, TestConfig};
use crate::utils::error::{HarnessError, Result};

/// Isolated place a single test case runs in
pub struct Sandbox {
    runner: Arc<dyn CommandRunner>,
    /// Removes the sandbox directory when dropped
    _dir: Option<TempDir>,
}

impl Sandbox {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner, _dir: None }
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.runner)
    }
}

/// Provides a fresh sandbox for every test case
#[async_trait]
pub trait SandboxFactory: Send + Sync {
    async fn create(&self, case: &TestCase) -> Result<Sandbox>;
}

/// Sandboxes backed by a temporary directory and a new virtual environment
#[derive(Debug, Clone, Default)]
pub struct VenvSandboxFactory {
    manager: VirtualEnvironmentManager,
    keep: bool,
}

impl VenvSandboxFactory {
    pub const fn new(manager: VirtualEnvironmentManager) -> Self {
        Self {
            manager,
            keep: false,
        }
    }

    /// Leave sandbox directories on disk after the case finishes
    #[must_use]
    pub const fn keep_sandboxes(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }
}

#[async_trait]
impl SandboxFactory for VenvSandboxFactory {
    async fn create(&self, case: &TestCase) -> Result<Sandbox> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("install-matrix-{}-", case.id()))
            .tempdir()?;
        let root = dir.path().to_path_buf();
        let project_dir = root.join("project");
        tokio::fs::create_dir_all(&project_dir).await?;

        let venv = self.manager.create(&root.join("venv")).await?;
        let runner = case_runner(case, &root, venv);
        let dir = retain_sandbox(dir, self.keep);

        Ok(Sandbox {
            runner: Arc::new(runner),
            _dir: dir,
        })
    }
}

/// Runner for `case` rooted at a sandbox directory; pipx keeps its home and apps inside it
fn case_runner(case: &TestCase, root: &Path, venv: VirtualEnvironment) -> VenvCommandRunner {
    let runner = VenvCommandRunner::new(venv, root.join("project"));
    if case.installer == InstallerKind::Pipx {
        runner
            .with_env("PIPX_HOME", root.join("home"))
            .with_env("PIPX_BIN_DIR", root.join("bin"))
    } else {
        runner
    }
}

/// Hand the directory back for removal on drop, or detach it so it stays on disk
fn retain_sandbox(dir: TempDir, keep: bool) -> Option<TempDir> {
    if keep {
        #[allow(deprecated)]
        let path: PathBuf = dir.into_path();
        info!(path = %path.display(), "keeping sandbox");
        None
    } else {
        Some(dir)
    }
}

pub struct TestDriver<F> {
    matrix: MatrixConfig,
    config: TestConfig,
    factory: F,
    fail_fast: bool,
}

impl<F: SandboxFactory> TestDriver<F> {
    pub const fn new(matrix: MatrixConfig, config: TestConfig, factory: F) -> Self {
        Self {
            matrix,
            config,
            factory,
            fail_fast: false,
        }
    }

    /// Stop after the first failing case
    #[must_use]
    pub const fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// The request a case installs with
    pub fn request_for(&self, case: &TestCase) -> InstallRequest {
        InstallRequest::new(self.matrix.package.clone())
            .with_url(self.config.url.clone())
            .with_revision(self.config.revision.clone())
            .with_version(self.config.version.clone())
            .with_extras(case.extras_list())
            .with_verbose(self.config.verbose)
    }

    /// Cases paired with the reason they will be skipped, if any
    pub fn plan(&self) -> Vec<(TestCase, Option<String>)> {
        self.matrix
            .cases()
            .into_iter()
            .map(|case| {
                let skip = self.config.skip_reason(&case);
                (case, skip)
            })
            .collect()
    }

    /// Run every case in order and report the outcome of each
    pub async fn run(&self) -> MatrixReport {
        let mut report = MatrixReport::new();

        for (case, skip) in self.plan() {
            if let Some(reason) = skip {
                report.record(case, CaseOutcome::Skipped(reason));
                continue;
            }

            info!(case = %case, "Installing {} with {}", self.matrix.package, case.installer);
            let outcome = match self.run_case(&case).await {
                Ok(()) => {
                    info!(case = %case, "passed");
                    CaseOutcome::Passed
                }
                Err(err) => {
                    if let Some((stdout, stderr)) = err.captured_output() {
                        error!(case = %case, "stdout:\n{stdout}");
                        error!(case = %case, "stderr:\n{stderr}");
                    }
                    error!(case = %case, "failed: {err}");
                    CaseOutcome::Failed(err.to_string())
                }
            };

            let failed = matches!(outcome, CaseOutcome::Failed(_));
            report.record(case, outcome);
            if failed && self.fail_fast {
                warn!("stopping after first failure");
                break;
            }
        }

        report
    }

    /// Setup, install and verify one case in a fresh sandbox
    pub async fn run_case(&self, case: &TestCase) -> Result<()> {
        let sandbox = self.factory.create(case).await?;
        let installer = build_installer(case.installer, sandbox.runner());

        installer.setup().await?;
        installer.install(&self.request_for(case)).await?;

        if installer.is_installed(&self.matrix.package).await? {
            Ok(())
        } else {
            Err(HarnessError::NotInstalled {
                installer: case.installer,
                package: self.matrix.package.clone(),
            })
        }
    }
}
