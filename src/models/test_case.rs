use serde::Serialize;
use std::fmt;

use crate::models::installer_kind::InstallerKind;

/// One cell of the installers × extras matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TestCase {
    pub installer: InstallerKind,
    pub extras: Option<String>,
}

impl TestCase {
    pub fn new(installer: InstallerKind, extras: Option<String>) -> Self {
        Self { installer, extras }
    }

    /// Stable identifier, e.g. `pipx-s3` or `pip-none`
    pub fn id(&self) -> String {
        let extras = self.extras.as_deref().unwrap_or("none");
        format!("{}-{}", self.installer, extras.to_lowercase())
    }

    /// Extras as the list an install request expects
    pub fn extras_list(&self) -> Vec<String> {
        self.extras.iter().cloned().collect()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum CaseOutcome {
    Passed,
    Skipped(String),
    Failed(String),
}

impl CaseOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Skipped(_) => "SKIPPED",
            Self::Failed(_) => "FAILED",
        }
    }
}

/// Outcomes of a matrix run, in execution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatrixReport {
    pub results: Vec<(TestCase, CaseOutcome)>,
}

impl MatrixReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, case: TestCase, outcome: CaseOutcome) {
        self.results.push((case, outcome));
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    /// True when no case failed; a fully skipped run counts as success
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome_of(&self, id: &str) -> Option<&CaseOutcome> {
        self.results
            .iter()
            .find(|(case, _)| case.id() == id)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, predicate: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| predicate(o)).count()
    }

    /// One-line summary in the style of a test runner
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}
