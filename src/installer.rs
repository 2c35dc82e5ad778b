//! Install run orchestration.
//!
//! [`Installer::run`] performs, strictly in order:
//!
//! 1. Resolve the game's install directory from the Steam library manifest
//! 2. Download the mod package into the working directory
//! 3. Delete a modded copy left by an earlier run
//! 4. Mirror the install directory into the modded copy
//! 5. Extract the package into the modded copy
//! 6. Delete the downloaded package
//! 7. Create a desktop shortcut to the modded executable
//! 8. Clear the game's cache directory
//!
//! The first failing step ends the run with its error. Nothing is retried and
//! nothing already done is rolled back.

use crate::metrics::InstallMetrics;
use crate::models::{InstallerConfig, UserEnvironment};
use crate::services::{self, ShortcutRequest, ShortcutWriter};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use std::time::Instant;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub install_dir: Utf8PathBuf,
    pub modded_dir: Utf8PathBuf,
    pub shortcut_path: Utf8PathBuf,
    /// An earlier modded copy was deleted first
    pub replaced_existing: bool,
    /// The cache directory existed and was removed
    pub cache_cleared: bool,
}

/// Sequences the install steps for one configuration
pub struct Installer<W: ShortcutWriter> {
    config: InstallerConfig,
    env: UserEnvironment,
    shortcut_writer: W,
    client: reqwest::Client,
    metrics: InstallMetrics,
}

impl<W: ShortcutWriter> Installer<W> {
    pub fn new(config: InstallerConfig, env: UserEnvironment, shortcut_writer: W) -> Self {
        Self {
            config,
            env,
            shortcut_writer,
            client: reqwest::Client::new(),
            metrics: InstallMetrics::new(),
        }
    }

    /// Use a preconfigured HTTP client (proxies, user agent)
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &InstallMetrics {
        &self.metrics
    }

    pub fn shortcut_writer(&self) -> &W {
        &self.shortcut_writer
    }

    /// Where the package is downloaded to
    pub fn package_path(&self) -> Utf8PathBuf {
        self.env.work_dir.join(&self.config.package_file)
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn run(&self) -> Result<InstallReport> {
        tracing::info!(
            "Installing mod for {} (app {})",
            self.config.app_name,
            self.config.app_id
        );

        let install_dir = self.timed("resolve install directory", || {
            services::resolve_install_dir(
                &self.config.library_manifest,
                &self.config.app_id,
                &self.config.app_name,
            )
        })?;

        let package_path = self.package_path();
        let step = "download package";
        let started = self.begin_step(step);
        let result =
            services::download_file(&self.client, &self.config.download_url, &package_path)
                .await;
        let downloaded = self.end_step(step, started, result)?;
        self.metrics.record_download(downloaded);

        let modded_dir = self.config.modded_dir_for(&install_dir);
        let replaced_existing = self.timed("delete stale modded copy", || {
            services::remove_stale_dir(&modded_dir)
        })?;

        let mirror_stats = self.timed("mirror install directory", || {
            services::mirror_dir(&install_dir, &modded_dir)
        })?;
        self.metrics.record_mirror(&mirror_stats);
        tracing::info!("{} folder copied to: {}", self.config.app_name, modded_dir);

        let extract_stats = self.timed("extract package", || {
            services::extract_zip(&package_path, &modded_dir)
        })?;
        self.metrics.record_extract(&extract_stats);

        self.timed("delete package", || {
            fs::remove_file(&package_path)
                .with_context(|| format!("Error deleting zip file {}", package_path))
        })?;
        tracing::info!("Zip file deleted successfully.");

        let shortcut_path = self.timed("create desktop shortcut", || {
            let profile = self.env.require_profile()?;
            let request = ShortcutRequest::for_executable(
                self.config.shortcut_path_for(profile),
                &modded_dir.join(&self.config.executable),
            );
            self.shortcut_writer
                .create_shortcut(&request)
                .context("Error creating desktop shortcut")?;
            Ok(request.shortcut_path)
        })?;

        let cache_cleared = self.timed("clear cache directory", || {
            let profile = self.env.require_profile()?;
            services::clear_cache_dir(&profile.join(&self.config.cache_dir))
        })?;

        self.metrics.log_summary();

        Ok(InstallReport {
            install_dir,
            modded_dir,
            shortcut_path,
            replaced_existing,
            cache_cleared,
        })
    }

    fn timed<T>(&self, step: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let started = self.begin_step(step);
        let result = f();
        self.end_step(step, started, result)
    }

    fn begin_step(&self, step: &str) -> Instant {
        tracing::info!("Step: {}", step);
        Instant::now()
    }

    fn end_step<T>(&self, step: &str, started: Instant, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                self.metrics.record_step(started.elapsed());
                tracing::debug!("Step '{}' finished in {:?}", step, started.elapsed());
            }
            Err(e) => tracing::error!("Step '{}' failed: {:#}", step, e),
        }
        result
    }
}
