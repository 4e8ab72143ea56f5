use clap::Args;
use serde_json::json;

use crate::cli::SelectionArgs;
use crate::services::test_driver::{TestDriver, VenvSandboxFactory};

/// List matrix cases without running them
#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub fn execute(&self, verbose: bool) -> anyhow::Result<i32> {
        let matrix = self.selection.matrix_config()?;
        let config = self.selection.test_config(verbose);
        let driver = TestDriver::new(matrix, config, VenvSandboxFactory::default());
        let plan = driver.plan();

        if self.json {
            let cases: Vec<_> = plan
                .iter()
                .map(|(case, skip)| {
                    json!({
                        "case": case.id(),
                        "installer": case.installer,
                        "extras": case.extras,
                        "skip": skip,
                        "spec": driver.request_for(case).spec(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&cases)?);
        } else {
            for (case, skip) in &plan {
                match skip {
                    None => println!("{case}\trun"),
                    Some(reason) => println!("{case}\tskip ({reason})"),
                }
            }
            let selected = plan.iter().filter(|(_, skip)| skip.is_none()).count();
            println!("{selected} of {} cases selected", plan.len());
        }

        Ok(0)
    }
}
