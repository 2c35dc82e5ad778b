//! Steam library resolution from `libraryfolders.vdf`.
//!
//! The manifest is a nested block format of quoted key/value pairs:
//!
//! ```text
//! "libraryfolders"
//! {
//!     "0"
//!     {
//!         "path"      "C:\\Program Files (x86)\\Steam"
//!         "apps"
//!         {
//!             "228980"    "169006855"
//!         }
//!     }
//!     "1"
//!     {
//!         "path"      "D:\\SteamLibrary"
//!         "apps"
//!         {
//!             "945360"    "463017728"
//!         }
//!     }
//! }
//! ```
//!
//! Resolution is a single forward line scan: the most recent `"path"` value seen
//! when the app id turns up inside an `"apps"` block names the library.

use crate::error::InstallError;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Directories between a library root and an installed game
pub const LIBRARY_SUBDIRS: [&str; 2] = ["steamapps", "common"];

/// State of one forward pass over a manifest
#[derive(Debug)]
struct LibraryScanner {
    app_token: String,
    current_library: Option<String>,
    in_apps_block: bool,
    found: bool,
}

impl LibraryScanner {
    fn new(app_id: &str) -> Self {
        Self {
            app_token: format!("\"{}\"", app_id),
            current_library: None,
            in_apps_block: false,
            found: false,
        }
    }

    /// Feed one line; returns true once the app id was seen inside an apps block.
    fn feed(&mut self, line: &str) -> bool {
        let line = line.trim();

        if line.contains("\"path\"") {
            // "path" <tab> "value" splits into ["", path, <tab>, value, ""]
            if let Some(value) = line.split('"').nth(3) {
                self.current_library = Some(value.to_string());
            }
        }

        if line.contains("\"apps\"") {
            self.in_apps_block = true;
            return false;
        }

        if self.in_apps_block {
            if line.contains(&self.app_token) {
                self.found = true;
                return true;
            }
            if line.starts_with('}') {
                self.in_apps_block = false;
            }
        }

        false
    }

    fn finish(self, app_id: &str, app_name: &str, manifest: &Utf8Path) -> Result<Utf8PathBuf> {
        match self.current_library {
            Some(library) if self.found && !library.is_empty() => {
                let install_dir = install_dir_in_library(&unescape(&library), app_name);
                tracing::info!("Found {} at {}", app_name, install_dir);
                Ok(install_dir)
            }
            _ => Err(InstallError::InstallNotFound {
                app_id: app_id.to_string(),
                app_name: app_name.to_string(),
                manifest: manifest.to_path_buf(),
            }
            .into()),
        }
    }
}

/// Resolves the install directory of `app_name` by reading the manifest file.
///
/// # Arguments
///
/// * `manifest` - Path to `libraryfolders.vdf`
/// * `app_id` - Steam application id, e.g. `945360`
/// * `app_name` - Game folder below `steamapps/common`, e.g. `Among Us`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or
/// [`InstallError::InstallNotFound`] if the game is not listed.
pub fn resolve_install_dir(
    manifest: &Utf8Path,
    app_id: &str,
    app_name: &str,
) -> Result<Utf8PathBuf> {
    let file = File::open(manifest)
        .with_context(|| format!("error opening file {:?}", manifest.as_str()))?;
    let reader = BufReader::new(file);

    let mut scanner = LibraryScanner::new(app_id);
    for line_result in reader.lines() {
        let line = line_result.with_context(|| format!("error reading file {}", manifest))?;
        if scanner.feed(&line) {
            break;
        }
    }

    scanner.finish(app_id, app_name, manifest)
}

/// Same as [`resolve_install_dir`] for manifest text already in memory.
///
/// `manifest` is only used to name the source in the not-found error.
pub fn resolve_install_dir_from_str(
    manifest_text: &str,
    app_id: &str,
    app_name: &str,
    manifest: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let mut scanner = LibraryScanner::new(app_id);
    for line in manifest_text.lines() {
        if scanner.feed(line) {
            break;
        }
    }

    scanner.finish(app_id, app_name, manifest)
}

/// Joins a library root with `steamapps/common/<app_name>`
pub fn install_dir_in_library(library: &str, app_name: &str) -> Utf8PathBuf {
    let mut path = Utf8PathBuf::from(library);
    for segment in LIBRARY_SUBDIRS {
        path.push(segment);
    }
    path.push(app_name);
    path
}

// VDF strings escape backslashes, so Windows library paths arrive as `D:\\SteamLibrary`.
fn unescape(value: &str) -> String {
    value.replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#""libraryfolders"
{
	"0"
	{
		"path"		"C:\\Program Files (x86)\\Steam"
		"label"		""
		"apps"
		{
			"228980"		"169006855"
			"250820"		"5488935710"
		}
	}
	"1"
	{
		"path"		"D:\\SteamLib"
		"label"		"games"
		"apps"
		{
			"945360"		"463017728"
		}
	}
}
"#;

    fn manifest_name() -> &'static Utf8Path {
        Utf8Path::new("libraryfolders.vdf")
    }

    #[test]
    fn test_resolves_second_library() {
        let dir =
            resolve_install_dir_from_str(MANIFEST, "945360", "Among Us", manifest_name()).unwrap();
        assert_eq!(dir, install_dir_in_library(r"D:\SteamLib", "Among Us"));
    }

    #[cfg(windows)]
    #[test]
    fn test_resolves_windows_path_verbatim() {
        let dir =
            resolve_install_dir_from_str(MANIFEST, "945360", "Among Us", manifest_name()).unwrap();
        assert_eq!(dir.as_str(), r"D:\SteamLib\steamapps\common\Among Us");
    }

    #[test]
    fn test_resolves_first_library() {
        let dir = resolve_install_dir_from_str(MANIFEST, "228980", "Steamworks Shared", manifest_name())
            .unwrap();
        assert_eq!(
            dir,
            install_dir_in_library(r"C:\Program Files (x86)\Steam", "Steamworks Shared")
        );
    }

    #[test]
    fn test_missing_app_is_not_found() {
        let err = resolve_install_dir_from_str(MANIFEST, "111111", "Nope", manifest_name())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::InstallNotFound { .. })
        ));
    }

    #[test]
    fn test_app_id_outside_apps_block_is_ignored() {
        // Size values can collide with app ids; only keys inside "apps" count.
        let text = r#"
"libraryfolders"
{
	"0"
	{
		"path"		"/mnt/games"
		"totalsize"		"945360"
		"apps"
		{
			"228980"		"1"
		}
	}
}
"#;
        assert!(resolve_install_dir_from_str(text, "945360", "Among Us", manifest_name()).is_err());
    }

    #[test]
    fn test_apps_block_closed_before_id() {
        let text = "\"path\" \"/lib\"\n\"apps\"\n{\n\"1\" \"2\"\n}\n\"945360\"\n";
        assert!(resolve_install_dir_from_str(text, "945360", "Among Us", manifest_name()).is_err());
    }

    #[test]
    fn test_malformed_path_line_keeps_previous_path() {
        let text = "\"path\" \"/good\"\n\"path\" broken\n\"apps\"\n{\n\"945360\" \"1\"\n}\n";
        let dir = resolve_install_dir_from_str(text, "945360", "Among Us", manifest_name()).unwrap();
        assert_eq!(dir, install_dir_in_library("/good", "Among Us"));
    }

    #[test]
    fn test_match_without_path_is_not_found() {
        let text = "\"apps\"\n{\n\"945360\" \"1\"\n}\n";
        assert!(resolve_install_dir_from_str(text, "945360", "Among Us", manifest_name()).is_err());
    }

    #[test]
    fn test_resolve_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", MANIFEST).unwrap();

        let path = Utf8Path::from_path(temp_file.path()).unwrap();
        let dir = resolve_install_dir(path, "945360", "Among Us").unwrap();
        assert_eq!(dir, install_dir_in_library(r"D:\SteamLib", "Among Us"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = resolve_install_dir(Utf8Path::new("/definitely/not/here.vdf"), "945360", "Among Us")
            .unwrap_err();
        assert!(err.to_string().contains("error opening file"));
    }

    proptest! {
        #[test]
        fn prop_most_recent_path_wins(
            earlier in prop::collection::vec("[a-zA-Z0-9/ _.-]{1,24}", 0..4),
            library in "/[a-zA-Z0-9/_.-]{1,24}",
            app_id in "[1-9][0-9]{2,7}",
        ) {
            let mut text = String::from("\"libraryfolders\"\n{\n");
            for (index, path) in earlier.iter().enumerate() {
                text.push_str(&format!(
                    "\t\"{index}\"\n\t{{\n\t\t\"path\"\t\t\"{path}\"\n\t\t\"apps\"\n\t\t{{\n\t\t\t\"7\"\t\t\"1\"\n\t\t}}\n\t}}\n"
                ));
            }
            text.push_str(&format!(
                "\t\"x\"\n\t{{\n\t\t\"path\"\t\t\"{library}\"\n\t\t\"apps\"\n\t\t{{\n\t\t\t\"{app_id}\"\t\t\"1\"\n\t\t}}\n\t}}\n}}\n"
            ));

            let dir = resolve_install_dir_from_str(&text, &app_id, "Game", manifest_name()).unwrap();
            prop_assert_eq!(dir, install_dir_in_library(&library, "Game"));
        }
    }
}
