use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Installer configuration from `installer.yaml`
///
/// Every value has a built-in default matching a stock Steam install on Windows,
/// so the file only needs to list what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Steam library manifest listing every library folder and its installed apps
    pub library_manifest: Utf8PathBuf,

    /// Steam application id of the game
    pub app_id: String,

    /// Folder name of the game below `steamapps/common`
    pub app_name: String,

    /// Location of the mod package
    pub download_url: String,

    /// File name the package is saved under, relative to the working directory
    pub package_file: String,

    /// Name of the modded copy, created next to the original install
    pub modded_dir_name: String,

    /// Game executable inside the install directory
    pub executable: String,

    /// Display name of the desktop shortcut
    pub shortcut_name: String,

    /// Environment variable holding the user profile directory
    pub profile_env: String,

    /// Desktop directory, relative to the user profile
    pub desktop_dir: Utf8PathBuf,

    /// Game cache directory, relative to the user profile
    pub cache_dir: Utf8PathBuf,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            library_manifest: Utf8PathBuf::from(
                r"C:\Program Files (x86)\Steam\steamapps\libraryfolders.vdf",
            ),
            app_id: "945360".to_string(),
            app_name: "Among Us".to_string(),
            download_url:
                "https://github.com/Eisbison/TheOtherRoles/releases/latest/download/TheOtherRoles.zip"
                    .to_string(),
            package_file: "TheOtherRoles.zip".to_string(),
            modded_dir_name: "Among Us Modded".to_string(),
            executable: "Among Us.exe".to_string(),
            shortcut_name: "Among Us Modded".to_string(),
            profile_env: "USERPROFILE".to_string(),
            desktop_dir: Utf8PathBuf::from("Desktop"),
            cache_dir: Utf8PathBuf::from("AppData/LocalLow/Innersloth"),
        }
    }
}

impl InstallerConfig {
    /// Directory of the modded copy for a given original install directory
    pub fn modded_dir_for(&self, install_dir: &Utf8Path) -> Utf8PathBuf {
        match install_dir.parent() {
            Some(parent) => parent.join(&self.modded_dir_name),
            None => Utf8PathBuf::from(&self.modded_dir_name),
        }
    }

    /// Shortcut file for a given user profile
    pub fn shortcut_path_for(&self, user_profile: &Utf8Path) -> Utf8PathBuf {
        user_profile
            .join(&self.desktop_dir)
            .join(format!("{}.lnk", self.shortcut_name))
    }
}
