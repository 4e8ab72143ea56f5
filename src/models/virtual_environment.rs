use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Name of the directory holding a virtual environment's console scripts
pub const fn scripts_dir_name() -> &'static str {
    if cfg!(windows) {
        "Scripts"
    } else {
        "bin"
    }
}

/// A disposable Python virtual environment the installers run inside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnvironment {
    /// Path to the virtual environment directory
    pub path: PathBuf,
    /// Python version reported by the interpreter that created it
    pub python_version: Option<String>,
}

impl VirtualEnvironment {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            python_version: None,
        }
    }

    /// Directory with the environment's console scripts (`bin` or `Scripts`)
    pub fn scripts_dir(&self) -> PathBuf {
        self.path.join(scripts_dir_name())
    }

    /// The environment's interpreter
    pub fn python(&self) -> PathBuf {
        self.script("python")
    }

    /// Path of the console script `name` installed into this environment
    pub fn script(&self, name: &str) -> PathBuf {
        if cfg!(windows) {
            self.scripts_dir().join(format!("{name}.exe"))
        } else {
            self.scripts_dir().join(name)
        }
    }

    /// Variables that activate this environment for a child process
    pub fn activation_env(&self) -> HashMap<String, OsString> {
        let mut env_vars = HashMap::new();
        env_vars.insert("VIRTUAL_ENV".to_string(), self.path.clone().into_os_string());

        let mut paths = vec![self.scripts_dir()];
        if let Some(current) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&current));
        }
        if let Ok(joined) = std::env::join_paths(paths) {
            env_vars.insert("PATH".to_string(), joined);
        }

        env_vars
    }

    pub fn exists(&self) -> bool {
        self.python().exists()
    }
}
