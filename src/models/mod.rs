//! Data models for the installer.
//!
//! - [`InstallerConfig`]: Every path, name and URL the install run needs, loaded from `installer.yaml`
//! - [`UserEnvironment`]: The user profile and working directory captured from the process at startup
//!
//! Both are plain values handed to [`Installer`](crate::installer::Installer) when it is built,
//! so tests can point a run at temporary directories and a local download server.

pub mod config;
pub mod environment;

pub use config::InstallerConfig;
pub use environment::UserEnvironment;
