use crate::error::InstallError;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Process environment captured once at startup.
///
/// Steps that write into the user profile (shortcut, cache cleanup) ask for it
/// through [`UserEnvironment::require_profile`]; an unset variable only fails those steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEnvironment {
    /// Name of the variable the profile was read from, kept for error messages
    pub profile_env: String,
    pub user_profile: Option<Utf8PathBuf>,
    /// Directory the package is downloaded into
    pub work_dir: Utf8PathBuf,
}

impl UserEnvironment {
    pub fn new(
        profile_env: impl Into<String>,
        user_profile: Option<Utf8PathBuf>,
        work_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            profile_env: profile_env.into(),
            user_profile,
            work_dir: work_dir.into(),
        }
    }

    /// Read the profile variable and current directory of this process.
    pub fn from_process(profile_env: &str) -> Result<Self> {
        let user_profile = std::env::var(profile_env)
            .ok()
            .filter(|value| !value.is_empty())
            .map(Utf8PathBuf::from);

        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let work_dir = Utf8PathBuf::try_from(cwd).context("Current directory is not UTF-8")?;

        if user_profile.is_none() {
            tracing::warn!("{} is not set; shortcut and cache steps will fail", profile_env);
        }

        Ok(Self::new(profile_env, user_profile, work_dir))
    }

    pub fn require_profile(&self) -> Result<&Utf8Path> {
        self.user_profile
            .as_deref()
            .ok_or_else(|| InstallError::MissingEnvVar(self.profile_env.clone()).into())
    }
}
