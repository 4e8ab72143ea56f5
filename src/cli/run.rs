use clap::Args;
use serde_json::json;

use crate::cli::SelectionArgs;
use crate::models::test_case::CaseOutcome;
use crate::services::test_driver::{TestDriver, VenvSandboxFactory};
use crate::services::virtual_environment_manager::VirtualEnvironmentManager;

/// Run the install matrix
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Python interpreter used to create the per-case virtual environments
    #[arg(long)]
    pub python: Option<String>,

    /// Stop after the first failing case
    #[arg(long, short = 'x')]
    pub fail_fast: bool,

    /// Keep sandbox directories for inspection
    #[arg(long)]
    pub keep_sandboxes: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl RunCommand {
    pub async fn execute(&self, verbose: bool) -> anyhow::Result<i32> {
        let matrix = self.selection.matrix_config()?;
        let config = self.selection.test_config(verbose);
        let factory = VenvSandboxFactory::new(VirtualEnvironmentManager::with_python(
            self.python.clone(),
        ))
        .keep_sandboxes(self.keep_sandboxes);

        let driver = TestDriver::new(matrix, config, factory).fail_fast(self.fail_fast);
        let report = driver.run().await;

        if self.json {
            let output = json!({
                "success": report.is_success(),
                "passed": report.passed(),
                "failed": report.failed(),
                "skipped": report.skipped(),
                "results": report.results.iter().map(|(case, outcome)| json!({
                    "case": case.id(),
                    "outcome": outcome,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for (case, outcome) in &report.results {
                match outcome {
                    CaseOutcome::Passed => println!("{case} {}", outcome.label()),
                    CaseOutcome::Skipped(reason) | CaseOutcome::Failed(reason) => {
                        println!("{case} {} ({reason})", outcome.label());
                    }
                }
            }
            println!("{}", report.summary());
        }

        Ok(i32::from(!report.is_success()))
    }
}
