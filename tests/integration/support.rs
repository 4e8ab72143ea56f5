use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use install_matrix::models::test_case::TestCase;
use install_matrix::services::test_driver::{Sandbox, SandboxFactory};
use install_matrix::{CommandOutput, CommandRunner, HarnessError, Result};

type Responder = dyn Fn(&str, &[String]) -> Result<CommandOutput> + Send + Sync;

/// Records every command and answers with a scripted response
pub struct ScriptedRunner {
    calls: Mutex<Vec<String>>,
    responder: Box<Responder>,
}

impl ScriptedRunner {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&str, &[String]) -> Result<CommandOutput> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Every tool reports the packages in `installed` and all other commands succeed
    pub fn with_installed(installed: &'static [&'static str]) -> Arc<Self> {
        Self::new(move |tool, args| Ok(default_response(tool, args, installed)))
    }

    /// Commands run so far, as space-joined command lines
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, tool: &str, args: &[String]) -> Result<CommandOutput> {
        let line = std::iter::once(tool.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line);
        (self.responder)(tool, args)
    }
}

/// Listing output in each tool's JSON format for the given packages
pub fn default_response(tool: &str, args: &[String], installed: &[&str]) -> CommandOutput {
    let sub = args.first().map(String::as_str);
    match (tool, sub) {
        ("pip", Some("list")) => CommandOutput::from_stdout(pip_list(installed)),
        ("pipx", Some("list")) => CommandOutput::from_stdout(pipx_list(installed)),
        ("pipenv", Some("graph")) => CommandOutput::from_stdout(pipenv_graph(installed)),
        ("poetry", Some("show")) => CommandOutput::from_stdout(format!("name : {}", args[1])),
        _ => CommandOutput::default(),
    }
}

pub fn pip_list(installed: &[&str]) -> String {
    let entries: Vec<_> = installed
        .iter()
        .map(|name| serde_json::json!({ "name": name, "version": "1.0.0" }))
        .collect();
    serde_json::to_string(&entries).unwrap()
}

pub fn pipx_list(installed: &[&str]) -> String {
    let venvs: serde_json::Map<_, _> = installed
        .iter()
        .map(|name| (name.to_string(), serde_json::json!({ "metadata": {} })))
        .collect();
    serde_json::json!({ "pipx_spec_version": "0.1", "venvs": venvs }).to_string()
}

pub fn pipenv_graph(installed: &[&str]) -> String {
    let entries: Vec<_> = installed
        .iter()
        .map(|name| {
            serde_json::json!({
                "package": { "key": name, "package_name": name, "installed_version": "1.0.0" },
                "dependencies": []
            })
        })
        .collect();
    serde_json::to_string(&entries).unwrap()
}

pub fn command_failed(command: &str, code: i32) -> HarnessError {
    HarnessError::CommandFailed {
        command: command.to_string(),
        code: Some(code),
        stdout: format!("{command} output"),
        stderr: format!("{command} error"),
    }
}

/// Hands every case the same scripted runner and remembers which cases asked
pub struct FakeSandboxFactory {
    pub runner: Arc<ScriptedRunner>,
    pub created: Mutex<Vec<String>>,
}

impl FakeSandboxFactory {
    pub fn new(runner: Arc<ScriptedRunner>) -> Self {
        Self {
            runner,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl SandboxFactory for FakeSandboxFactory {
    async fn create(&self, case: &TestCase) -> Result<Sandbox> {
        self.created.lock().unwrap().push(case.id());
        let runner: Arc<dyn CommandRunner> = self.runner.clone();
        Ok(Sandbox::new(runner))
    }
}
