//! CLI command implementations.

pub mod build;
pub mod init;

pub use build::build_site;
pub use init::init_project;
