use clap::Args;

use crate::models::install_request::InstallRequest;
use crate::models::installer_kind::InstallerKind;
use crate::utils::config::DEFAULT_PACKAGE;

/// Show the install argument each installer receives
#[derive(Debug, Args)]
pub struct SpecCommand {
    /// Package name
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    pub package: String,

    /// URL of the package to install from
    #[arg(long)]
    pub url: Option<String>,

    /// Revision to use with --url
    #[arg(long)]
    pub rev: Option<String>,

    /// Version to install
    #[arg(long = "pkg-version")]
    pub pkg_version: Option<String>,

    /// Extras to install, comma separated
    #[arg(long, value_delimiter = ',')]
    pub extras: Vec<String>,

    /// Only show this installer
    #[arg(long)]
    pub installer: Option<InstallerKind>,
}

impl SpecCommand {
    pub fn execute(&self, verbose: bool) -> anyhow::Result<i32> {
        let request = InstallRequest::new(self.package.clone())
            .with_url(self.url.clone())
            .with_revision(self.rev.clone())
            .with_version(self.pkg_version.clone())
            .with_extras(self.extras.iter().filter(|e| !e.is_empty()))
            .with_verbose(verbose);

        let installers = self
            .installer
            .map_or_else(|| InstallerKind::ALL.to_vec(), |kind| vec![kind]);

        for kind in installers {
            let args = if kind.uses_extras_flags() {
                request.poetry_spec().into_args().join(" ")
            } else {
                request.spec()
            };
            println!("{kind}\t{args}");
        }

        Ok(0)
    }
}
