//! Desktop shortcut creation.
//!
//! Windows has no command-line tool that writes `.lnk` files, so the shortcut is
//! described in a small VBScript and handed to `cscript`. The script lives in a
//! temporary file that is removed when this module is done with it, whether or
//! not the interpreter succeeded.

use crate::error::InstallError;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::Command;

/// Everything a shortcut needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutRequest {
    /// The `.lnk` file to write
    pub shortcut_path: Utf8PathBuf,
    pub target: Utf8PathBuf,
    pub working_dir: Utf8PathBuf,
}

impl ShortcutRequest {
    /// Shortcut to `target`, started from the directory containing it
    pub fn for_executable(shortcut_path: impl Into<Utf8PathBuf>, target: &Utf8Path) -> Self {
        let working_dir = target
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_default();

        Self {
            shortcut_path: shortcut_path.into(),
            target: target.to_path_buf(),
            working_dir,
        }
    }
}

/// Writes platform shortcuts. Overwriting an existing shortcut is allowed.
#[cfg_attr(test, mockall::automock)]
pub trait ShortcutWriter {
    fn create_shortcut(&self, request: &ShortcutRequest) -> Result<()>;
}

/// [`ShortcutWriter`] backed by the Windows Script Host
#[derive(Debug, Clone)]
pub struct CscriptShortcutWriter {
    interpreter: String,
}

impl CscriptShortcutWriter {
    pub fn new() -> Self {
        Self {
            interpreter: "cscript".to_string(),
        }
    }

    /// Use a different interpreter binary; it is invoked as `<interpreter> //nologo <script>`
    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for CscriptShortcutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutWriter for CscriptShortcutWriter {
    fn create_shortcut(&self, request: &ShortcutRequest) -> Result<()> {
        let script = render_shortcut_script(request);

        let mut script_file = tempfile::Builder::new()
            .prefix("createshortcut-")
            .suffix(".vbs")
            .tempfile()
            .context("failed to create temporary VBS file")?;
        script_file
            .write_all(script.as_bytes())
            .context("failed to write to temporary VBS file")?;

        // Closes the handle so the interpreter can open the file; the path is deleted on drop.
        let script_path = script_file.into_temp_path();
        tracing::debug!("Running {} //nologo {}", self.interpreter, script_path.display());

        let output = Command::new(&self.interpreter)
            .arg("//nologo")
            .arg(&*script_path)
            .output()
            .with_context(|| format!("failed to execute VBS script with {}", self.interpreter))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            return Err(InstallError::Interpreter {
                interpreter: self.interpreter.clone(),
                status: output.status.to_string(),
                output: combined.trim().to_string(),
            }
            .into());
        }

        tracing::info!("Desktop shortcut created at {}", request.shortcut_path);
        Ok(())
    }
}

/// Builds the VBScript that saves `request` as a `.lnk` file.
pub fn render_shortcut_script(request: &ShortcutRequest) -> String {
    format!(
        concat!(
            "Set oWS = WScript.CreateObject(\"WScript.Shell\")\n",
            "sLinkFile = \"{}\"\n",
            "Set oLink = oWS.CreateShortcut(sLinkFile)\n",
            "oLink.TargetPath = \"{}\"\n",
            "oLink.WorkingDirectory = \"{}\"\n",
            "oLink.Save\n",
        ),
        vbs_escape(request.shortcut_path.as_str()),
        vbs_escape(request.target.as_str()),
        vbs_escape(request.working_dir.as_str()),
    )
}

// VBScript string literals escape a quote by doubling it.
fn vbs_escape(value: &str) -> String {
    value.replace('"', "\"\"")
}
