use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::ErrorKind;

/// Deletes the game's cached data below the user profile.
///
/// A missing directory counts as already cleared.
///
/// # Returns
/// `true` if a directory was removed
pub fn clear_cache_dir(cache_dir: &Utf8Path) -> Result<bool> {
    tracing::info!("Deleting directory: {}", cache_dir);

    match fs::remove_dir_all(cache_dir) {
        Ok(()) => {
            tracing::info!("AppData directory deleted successfully.");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist, nothing to clear", cache_dir);
            Ok(false)
        }
        Err(e) => Err(e).with_context(|| format!("error deleting directory {}", cache_dir)),
    }
}
