use crate::models::InstallerConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the installer configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "installer.yaml";

/// Prefix of environment variables that override configuration values
/// (`MODINSTALL_APP_ID`, `MODINSTALL_DOWNLOAD_URL`, ...)
pub const ENV_PREFIX: &str = "MODINSTALL";

/// Configuration manager for loading and saving the installer configuration.
///
/// Values are layered: built-in defaults, then `installer.yaml` (optional),
/// then `MODINSTALL_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing `installer.yaml` (e.g., "ModInstaller Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the installer configuration.
    ///
    /// # Returns
    /// The layered InstallerConfig; defaults fill anything the file and environment leave out
    pub fn load_config(&self) -> Result<InstallerConfig> {
        self.load_layered(None)
    }

    /// Load the installer configuration, taking overrides from `vars` instead of the
    /// process environment.
    ///
    /// # Arguments
    /// * `vars` - Variable name/value pairs, e.g. `("MODINSTALL_APP_ID", "945360")`
    pub fn load_config_with_env<I, K, V>(&self, vars: I) -> Result<InstallerConfig>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.load_layered(Some(source))
    }

    fn load_layered(
        &self,
        env_source: Option<config::Map<String, String>>,
    ) -> Result<InstallerConfig> {
        if self.config_path.exists() {
            tracing::info!("Loading installer config from {}", self.config_path);
        } else {
            tracing::warn!(
                "Installer config file not found at {}, using defaults",
                self.config_path
            );
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(self.config_path.as_std_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .source(env_source),
            )
            .build()
            .with_context(|| format!("Failed to read installer config: {}", self.config_path))?;

        let config: InstallerConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse installer config: {}", self.config_path))?;

        tracing::debug!("Effective installer config: {:?}", config);
        Ok(config)
    }

    /// Save the installer configuration file.
    ///
    /// # Arguments
    /// * `config` - The InstallerConfig to save
    pub fn save_config(&self, config: &InstallerConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize installer config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write installer config: {}", self.config_path))?;

        tracing::info!("Saved installer config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the configuration file path.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager_creates_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let nested = root.join("ModInstaller Data");

        let manager = ConfigManager::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(manager.config_path(), nested.join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.app_id, InstallerConfig::default().app_id);
        assert_eq!(loaded.executable, "Among Us.exe");
    }

    #[test]
    fn test_load_save_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = InstallerConfig::default();
        config.modded_dir_name = "Among Us TOR".to_string();
        config.library_manifest = Utf8PathBuf::from("D:/Steam/steamapps/libraryfolders.vdf");
        manager.save_config(&config).unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.modded_dir_name, "Among Us TOR");
        assert_eq!(
            loaded.library_manifest,
            Utf8PathBuf::from("D:/Steam/steamapps/libraryfolders.vdf")
        );
    }
}
