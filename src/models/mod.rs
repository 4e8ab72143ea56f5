// Models module for data structures
pub mod install_request;
pub mod installer_kind;
pub mod test_case;
pub mod virtual_environment;
