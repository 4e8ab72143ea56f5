// install-matrix - installer integration-test harness
// Core library functionality

pub mod cli;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use models::install_request::{build_poetry_spec, build_spec, InstallRequest, PoetrySpec};
pub use models::installer_kind::InstallerKind;
pub use services::command_runner::{CommandOutput, CommandRunner};
pub use services::installers::{build_installer, Installer};
pub use utils::error::{HarnessError, Result};
