// Installer abstraction over pip, pipx, poetry and pipenv

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::models::install_request::InstallRequest;
use crate::models::installer_kind::InstallerKind;
use crate::services::command_runner::CommandRunner;
use crate::utils::error::{HarnessError, Result};

static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("static regex is valid"));

/// Canonical form of a distribution name, so `Foo_Bar` and `foo-bar` compare equal
pub fn normalize_package_name(name: &str) -> String {
    NAME_SEPARATORS.replace_all(name, "-").to_lowercase()
}

/// A package-installation tool under test
#[async_trait]
pub trait Installer: Send + Sync {
    fn kind(&self) -> InstallerKind;

    /// One-time preparation before the first install; safe to call again
    async fn setup(&self) -> Result<()> {
        Ok(())
    }

    async fn install(&self, request: &InstallRequest) -> Result<()>;

    async fn is_installed(&self, package: &str) -> Result<bool>;
}

/// Construct the installer for `kind`, sharing one pip for bootstrapping
pub fn build_installer(kind: InstallerKind, runner: Arc<dyn CommandRunner>) -> Box<dyn Installer> {
    let pip = || Arc::new(PipInstaller::new(Arc::clone(&runner)));
    match kind {
        InstallerKind::Pip => Box::new(PipInstaller::new(runner)),
        InstallerKind::Pipx => {
            let pip = pip();
            Box::new(PipxInstaller::new(runner, pip))
        }
        InstallerKind::Poetry => {
            let pip = pip();
            Box::new(PoetryInstaller::new(runner, pip))
        }
        InstallerKind::Pipenv => {
            let pip = pip();
            Box::new(PipenvInstaller::new(runner, pip))
        }
    }
}

/// Install `kind`'s tool into the environment with pip and check it landed
async fn bootstrap(pip: &PipInstaller, kind: InstallerKind) -> Result<()> {
    let tool = kind.command();
    pip.install(&InstallRequest::new(tool)).await?;
    if pip.is_installed(tool).await? {
        Ok(())
    } else {
        Err(HarnessError::SetupFailed {
            installer: kind,
            message: format!("{tool} is missing after `pip install {tool}`"),
        })
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

pub struct PipInstaller {
    runner: Arc<dyn CommandRunner>,
}

#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
}

impl PipInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Normalised names of every distribution in the environment
    pub async fn installed_packages(&self) -> Result<Vec<String>> {
        let output = self
            .runner
            .run("pip", &owned(&["list", "--format=json"]))
            .await?;
        let entries: Vec<PipListEntry> = serde_json::from_str(&output.stdout)?;
        Ok(entries
            .iter()
            .map(|entry| normalize_package_name(&entry.name))
            .collect())
    }
}

#[async_trait]
impl Installer for PipInstaller {
    fn kind(&self) -> InstallerKind {
        InstallerKind::Pip
    }

    async fn install(&self, request: &InstallRequest) -> Result<()> {
        let mut args = owned(&["install"]);
        if request.verbose {
            args.push("--verbose".to_string());
        }
        if request.wants_upgrade() {
            args.push("--upgrade".to_string());
        }
        args.push(request.spec());

        info!("Installing {} with pip", request.package);
        self.runner.run("pip", &args).await?;
        Ok(())
    }

    async fn is_installed(&self, package: &str) -> Result<bool> {
        let wanted = normalize_package_name(package);
        Ok(self.installed_packages().await?.contains(&wanted))
    }
}

pub struct PipxInstaller {
    runner: Arc<dyn CommandRunner>,
    pip: Arc<PipInstaller>,
}

/// `pipx list --json`; only the venv names matter here
#[derive(Debug, Deserialize)]
struct PipxList {
    venvs: HashMap<String, serde_json::Value>,
}

impl PipxInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>, pip: Arc<PipInstaller>) -> Self {
        Self { runner, pip }
    }
}

#[async_trait]
impl Installer for PipxInstaller {
    fn kind(&self) -> InstallerKind {
        InstallerKind::Pipx
    }

    async fn setup(&self) -> Result<()> {
        bootstrap(&self.pip, self.kind()).await
    }

    async fn install(&self, request: &InstallRequest) -> Result<()> {
        let mut args = owned(&["install"]);
        if request.verbose {
            args.push("--verbose".to_string());
        }
        if request.wants_upgrade() {
            args.push("--pip-args=--upgrade".to_string());
        }
        args.push(request.spec());

        info!("Installing {} with pipx", request.package);
        self.runner.run("pipx", &args).await?;
        Ok(())
    }

    async fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self.runner.run("pipx", &owned(&["list", "--json"])).await?;
        debug!(stdout = %output.stdout, "pipx list");
        let listing: PipxList = serde_json::from_str(&output.stdout)?;
        Ok(listing.venvs.contains_key(package))
    }
}

pub struct PoetryInstaller {
    runner: Arc<dyn CommandRunner>,
    pip: Arc<PipInstaller>,
}

impl PoetryInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>, pip: Arc<PipInstaller>) -> Self {
        Self { runner, pip }
    }
}

#[async_trait]
impl Installer for PoetryInstaller {
    fn kind(&self) -> InstallerKind {
        InstallerKind::Poetry
    }

    async fn setup(&self) -> Result<()> {
        bootstrap(&self.pip, self.kind()).await?;
        self.runner.run("poetry", &owned(&["init", "-n"])).await?;
        Ok(())
    }

    async fn install(&self, request: &InstallRequest) -> Result<()> {
        let mut args = owned(&["add"]);
        if request.verbose {
            args.push("-vvv".to_string());
        }
        args.extend(request.poetry_spec().into_args());

        info!("Installing {} with Poetry", request.package);
        self.runner.run("poetry", &args).await?;
        Ok(())
    }

    async fn is_installed(&self, package: &str) -> Result<bool> {
        match self.runner.run("poetry", &owned(&["show", package])).await {
            Ok(_) => Ok(true),
            // poetry reports an unknown package with exit code 1 specifically
            Err(HarnessError::CommandFailed {
                code: Some(1),
                stdout,
                ..
            }) => {
                debug!(%stdout, "poetry show: package not found");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

pub struct PipenvInstaller {
    runner: Arc<dyn CommandRunner>,
    pip: Arc<PipInstaller>,
}

#[derive(Debug, Deserialize)]
struct GraphEntry {
    #[serde(default)]
    package: Option<GraphPackage>,
}

#[derive(Debug, Deserialize)]
struct GraphPackage {
    #[serde(default)]
    key: Option<String>,
}

impl PipenvInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>, pip: Arc<PipInstaller>) -> Self {
        Self { runner, pip }
    }
}

#[async_trait]
impl Installer for PipenvInstaller {
    fn kind(&self) -> InstallerKind {
        InstallerKind::Pipenv
    }

    async fn setup(&self) -> Result<()> {
        bootstrap(&self.pip, self.kind()).await
    }

    async fn install(&self, request: &InstallRequest) -> Result<()> {
        let mut args = owned(&["install"]);
        if request.verbose {
            args.push("--verbose".to_string());
        }
        args.push(request.spec());

        info!("Installing {} with pipenv", request.package);
        self.runner.run("pipenv", &args).await?;
        Ok(())
    }

    async fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self
            .runner
            .run("pipenv", &owned(&["graph", "--json"]))
            .await?;
        debug!(stdout = %output.stdout, "pipenv graph");
        let graph: Vec<GraphEntry> = serde_json::from_str(&output.stdout)?;
        Ok(graph
            .iter()
            .filter_map(|entry| entry.package.as_ref()?.key.as_deref())
            .any(|key| key == package))
    }
}
