use install_matrix::models::test_case::CaseOutcome;
use install_matrix::services::test_driver::{TestDriver, VenvSandboxFactory};
use install_matrix::services::virtual_environment_manager::VirtualEnvironmentManager;
use install_matrix::utils::config::{ExtrasFilter, MatrixConfig, TestConfig};
use install_matrix::InstallerKind;

/// Installs a small real package with pip into a fresh virtual environment.
/// Needs Python and network access.
#[tokio::test]
#[ignore = "requires python and network access"]
async fn test_pip_installs_real_package() {
    let matrix = MatrixConfig::default().with_package("six");
    let config = TestConfig {
        installer: Some(InstallerKind::Pip),
        extras: ExtrasFilter::Only(None),
        ..Default::default()
    };
    let driver = TestDriver::new(
        matrix,
        config,
        VenvSandboxFactory::new(VirtualEnvironmentManager::new()),
    );

    let report = driver.run().await;
    assert_eq!(report.outcome_of("pip-none"), Some(&CaseOutcome::Passed));
}
