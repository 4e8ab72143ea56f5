// Services module for process execution, environments and installers
pub mod command_runner;
pub mod installers;
pub mod test_driver;
pub mod virtual_environment_manager;
