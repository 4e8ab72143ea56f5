// CLI module for command-line interface

pub mod list;
pub mod run;
pub mod spec;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::installer_kind::InstallerKind;
use crate::utils::config::{ExtrasFilter, MatrixConfig, TestConfig};

use self::list::ListCommand;
use self::run::RunCommand;
use self::spec::SpecCommand;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "install-matrix")]
#[command(about = "Verify a Python package installs with pip, pipx, poetry and pipenv")]
#[command(long_about = r#"install-matrix installs a package (dvc by default) through every supported
installer and extras combination, each inside a fresh virtual environment,
and checks that the installer reports it as installed afterwards.

Installers, in the order they run:
  pip       basic package manager
  pipx      application-isolation installer
  poetry    dependency-management tool
  pipenv    virtual-environment-based dependency manager

Examples:
  install-matrix run                              Run the whole matrix
  install-matrix run --installer pipx --extras s3 Run a single case
  install-matrix run --url git+https://github.com/iterative/dvc --rev main
  install-matrix list --installer poetry          Show which cases would run
  install-matrix spec --extras s3,ssh             Show the generated specs"#)]
#[command(version)]
pub struct Cli {
    /// Increase output verbosity; also passed on to the installers
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Install the package with every selected installer and extras value
    Run(RunCommand),
    /// List the matrix cases and whether they would run
    List(ListCommand),
    /// Print the spec strings each installer would be given
    Spec(SpecCommand),
}

/// Options that select and parametrise matrix cases
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// URL of the package to install from
    #[arg(long, env = "INSTALL_MATRIX_URL")]
    pub url: Option<String>,

    /// Only run this installer
    #[arg(long, env = "INSTALL_MATRIX_INSTALLER")]
    pub installer: Option<InstallerKind>,

    /// Only run this extras value ("none" for the plain install)
    #[arg(long, env = "INSTALL_MATRIX_EXTRAS")]
    pub extras: Option<String>,

    /// Version to install
    #[arg(long = "pkg-version", env = "INSTALL_MATRIX_PKG_VERSION")]
    pub pkg_version: Option<String>,

    /// Revision to use with --url
    #[arg(long, env = "INSTALL_MATRIX_REV")]
    pub rev: Option<String>,

    /// Package to verify (overrides the matrix file)
    #[arg(long)]
    pub package: Option<String>,

    /// TOML file describing the package, installers and extras to test
    #[arg(long)]
    pub matrix: Option<PathBuf>,
}

impl SelectionArgs {
    pub fn test_config(&self, verbose: bool) -> TestConfig {
        TestConfig {
            url: self.url.clone(),
            installer: self.installer,
            extras: ExtrasFilter::parse(self.extras.as_deref()),
            version: self.pkg_version.clone(),
            verbose,
            revision: self.rev.clone(),
        }
    }

    pub fn matrix_config(&self) -> anyhow::Result<MatrixConfig> {
        let matrix = match &self.matrix {
            Some(path) => MatrixConfig::load(path)
                .with_context(|| format!("loading matrix from {}", path.display()))?,
            None => MatrixConfig::default(),
        };

        Ok(match &self.package {
            Some(package) => {
                let matrix = matrix.with_package(package.clone());
                matrix.validate()?;
                matrix
            }
            None => matrix,
        })
    }
}

/// CLI command dispatcher
pub struct CliDispatcher;

impl CliDispatcher {
    /// Execute a CLI command and return the process exit code
    pub async fn execute(cli: Cli) -> anyhow::Result<i32> {
        let verbose = cli.verbose > 0;
        match cli.command {
            Commands::Run(cmd) => cmd.execute(verbose).await,
            Commands::List(cmd) => cmd.execute(verbose),
            Commands::Spec(cmd) => cmd.execute(verbose),
        }
    }
}
