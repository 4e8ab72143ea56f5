// Install requests and the spec strings installers receive

use serde::{Deserialize, Serialize};

/// Everything an installer needs to know to install one package
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallRequest {
    /// Distribution name, e.g. `dvc`
    pub package: String,
    /// Non-registry source such as `git+https://github.com/iterative/dvc`
    pub source_url: Option<String>,
    /// Commit, tag or branch; only used together with `source_url`
    pub revision: Option<String>,
    /// Registry version pin; ignored when `source_url` is set
    pub version: Option<String>,
    /// Optional-dependency groups to install
    pub extras: Vec<String>,
    /// Ask the installer for verbose output
    pub verbose: bool,
}

impl InstallRequest {
    /// Create a plain registry request for the latest release of `package`
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    /// Install from a non-registry source
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.source_url = url;
        self
    }

    /// Pin the source revision
    #[must_use]
    pub fn with_revision(mut self, revision: Option<String>) -> Self {
        self.revision = revision;
        self
    }

    /// Pin the registry version
    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_extras<I, S>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extras = extras.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether the installer should be told to upgrade an existing install
    pub const fn wants_upgrade(&self) -> bool {
        self.version.is_none()
    }

    /// Spec string in the bracket syntax used by pip, pipx and pipenv
    pub fn spec(&self) -> String {
        build_spec(
            &self.package,
            self.source_url.as_deref(),
            self.revision.as_deref(),
            self.version.as_deref(),
            &self.extras,
        )
    }

    /// Spec string and trailing `--extras` arguments in poetry's syntax
    pub fn poetry_spec(&self) -> PoetrySpec {
        build_poetry_spec(
            &self.package,
            self.source_url.as_deref(),
            self.revision.as_deref(),
            self.version.as_deref(),
            &self.extras,
        )
    }
}

/// Build an installable reference such as `dvc[s3,ssh]==2.0.0` or
/// `git+https://github.com/iterative/dvc@abc#egg=dvc`.
///
/// The source URL takes precedence over the version pin, and the revision is
/// only applied to URL sources.
pub fn build_spec<S: AsRef<str>>(
    package: &str,
    url: Option<&str>,
    revision: Option<&str>,
    version: Option<&str>,
    extras: &[S],
) -> String {
    let mut spec = url.unwrap_or(package).to_string();

    if let Some(url_rev) = url.and(revision) {
        spec.push('@');
        spec.push_str(url_rev);
    }
    if url.is_some() {
        spec.push_str("#egg=");
        spec.push_str(package);
    }
    if !extras.is_empty() {
        let joined: Vec<&str> = extras.iter().map(AsRef::as_ref).collect();
        spec.push('[');
        spec.push_str(&joined.join(","));
        spec.push(']');
    }
    if let (Some(version), None) = (version, url) {
        spec.push_str("==");
        spec.push_str(version);
    }

    spec
}

/// A poetry `add` argument plus the extras it takes as separate flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoetrySpec {
    pub spec: String,
    pub extras_args: Vec<String>,
}

impl PoetrySpec {
    /// The spec followed by its `--extras` pairs, ready to append to `poetry add`
    pub fn into_args(self) -> Vec<String> {
        let mut args = Vec::with_capacity(1 + self.extras_args.len());
        args.push(self.spec);
        args.extend(self.extras_args);
        args
    }
}

/// Build the argument poetry's `add` command expects.
///
/// Registry installs are always pinned (`@latest` or `==version`). Poetry
/// resolves an unpinned git source to the branch head, so a revision is
/// appended as `#rev` whenever one is given.
pub fn build_poetry_spec<S: AsRef<str>>(
    package: &str,
    url: Option<&str>,
    revision: Option<&str>,
    version: Option<&str>,
    extras: &[S],
) -> PoetrySpec {
    let spec = match (url, version, revision) {
        (None, None, _) => format!("{package}@latest"),
        (None, Some(version), _) => format!("{package}=={version}"),
        (Some(url), _, Some(revision)) => format!("{url}#{revision}"),
        (Some(url), _, None) => url.to_string(),
    };

    let extras_args = extras
        .iter()
        .flat_map(|extra| ["--extras".to_string(), extra.as_ref().to_string()])
        .collect();

    PoetrySpec { spec, extras_args }
}
