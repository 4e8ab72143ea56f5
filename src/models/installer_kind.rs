use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::HarnessError;

/// The package-installation tools a package is verified against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerKind {
    /// Basic package manager
    Pip,
    /// Application-isolation installer
    Pipx,
    /// Dependency-management tool
    Poetry,
    /// Virtual-environment-based dependency manager
    Pipenv,
}

impl InstallerKind {
    /// All installers, ordered from least to most likely to fail
    pub const ALL: [Self; 4] = [Self::Pip, Self::Pipx, Self::Poetry, Self::Pipenv];

    /// Returns the executable name of the underlying tool
    pub const fn command(self) -> &'static str {
        match self {
            Self::Pip => "pip",
            Self::Pipx => "pipx",
            Self::Poetry => "poetry",
            Self::Pipenv => "pipenv",
        }
    }

    /// Whether extras are passed as repeated `--extras` flags instead of inline brackets
    pub const fn uses_extras_flags(self) -> bool {
        matches!(self, Self::Poetry)
    }
}

impl fmt::Display for InstallerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl std::str::FromStr for InstallerKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pip" => Ok(Self::Pip),
            "pipx" => Ok(Self::Pipx),
            "poetry" => Ok(Self::Poetry),
            "pipenv" => Ok(Self::Pipenv),
            other => Err(HarnessError::Config(format!(
                "unknown installer '{other}' (expected one of: pip, pipx, poetry, pipenv)"
            ))),
        }
    }
}
