// Session configuration and matrix file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::models::installer_kind::InstallerKind;
use crate::models::test_case::TestCase;
use crate::utils::error::{HarnessError, Result};

/// Package verified when no other is configured
pub const DEFAULT_PACKAGE: &str = "dvc";

/// Extras in order of being least trouble to very problematic installations
pub const DEFAULT_EXTRAS: &[Option<&str>] = &[
    None,
    Some("webdav"),
    Some("oss"),
    Some("ssh"),
    Some("webhdfs"),
    Some("gdrive"),
    Some("azure"),
    Some("gs"),
    Some("hdfs"),
    Some("s3"),
    Some("all"),
];

/// Restriction on which extras value runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtrasFilter {
    /// No `--extras` given: every extras value runs
    #[default]
    Any,
    /// Only this value runs; `None` selects the case without extras
    Only(Option<String>),
}

impl ExtrasFilter {
    /// Interpret an `--extras` option; `none` (any case) selects the case without extras
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Self::Any,
            Some(v) if v.eq_ignore_ascii_case("none") => Self::Only(None),
            Some(v) => Self::Only(Some(v.to_string())),
        }
    }
}

/// Operator-selected options for one session, resolved once from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestConfig {
    pub url: Option<String>,
    pub installer: Option<InstallerKind>,
    pub extras: ExtrasFilter,
    pub version: Option<String>,
    pub verbose: bool,
    pub revision: Option<String>,
}

impl TestConfig {
    pub fn allows_installer(&self, installer: InstallerKind) -> bool {
        self.installer.map_or(true, |selected| selected == installer)
    }

    pub fn allows_extras(&self, extras: Option<&str>) -> bool {
        match &self.extras {
            ExtrasFilter::Any => true,
            ExtrasFilter::Only(selected) => selected.as_deref() == extras,
        }
    }

    /// Why `case` should not run, or `None` when it should
    pub fn skip_reason(&self, case: &TestCase) -> Option<String> {
        if !self.allows_installer(case.installer) {
            return Some(format!("skipping installer '{}'", case.installer));
        }
        if !self.allows_extras(case.extras.as_deref()) {
            return Some(format!(
                "skipping extras '{}'",
                case.extras.as_deref().unwrap_or("none")
            ));
        }
        None
    }
}

/// The package and the installers × extras matrix to verify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixConfig {
    pub package: String,
    pub installers: Vec<InstallerKind>,
    pub extras: Vec<Option<String>>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            installers: InstallerKind::ALL.to_vec(),
            extras: DEFAULT_EXTRAS
                .iter()
                .map(|e| e.map(str::to_string))
                .collect(),
        }
    }
}

/// On-disk shape of a matrix file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatrixToml {
    package: Option<String>,
    installers: Option<Vec<InstallerKind>>,
    extras: Option<Vec<String>>,
}

impl MatrixConfig {
    /// Every case of the matrix, installers outermost
    pub fn cases(&self) -> Vec<TestCase> {
        self.installers
            .iter()
            .flat_map(|installer| {
                self.extras
                    .iter()
                    .map(move |extras| TestCase::new(*installer, extras.clone()))
            })
            .collect()
    }

    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HarnessError::Config(format!(
                "Matrix file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: MatrixToml = toml::from_str(content)?;
        let defaults = Self::default();

        let matrix = Self {
            package: raw.package.unwrap_or(defaults.package),
            installers: raw.installers.unwrap_or(defaults.installers),
            extras: raw.extras.map_or(defaults.extras, |extras| {
                extras
                    .into_iter()
                    .map(|e| (!e.eq_ignore_ascii_case("none")).then_some(e))
                    .collect()
            }),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    pub fn validate(&self) -> Result<()> {
        if self.package.trim().is_empty() {
            return Err(HarnessError::Config("package name cannot be empty".to_string()));
        }
        if self.installers.is_empty() {
            return Err(HarnessError::Config(
                "at least one installer is required".to_string(),
            ));
        }
        if self.extras.is_empty() {
            return Err(HarnessError::Config(
                "extras list cannot be empty (use \"none\" for a plain install)".to_string(),
            ));
        }
        Ok(())
    }
}
