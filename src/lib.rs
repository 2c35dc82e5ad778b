// AmongUs Modder - creates a modded copy of an Among Us Steam installation
//
// This is the library crate containing the install steps and their orchestration.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod error;
pub mod installer;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::InstallError;
pub use installer::{InstallReport, Installer};
pub use models::{InstallerConfig, UserEnvironment};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
