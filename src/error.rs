// Error taxonomy for the install pipeline
//
// Filesystem failures travel as `std::io::Error` wrapped in `anyhow` context;
// everything a caller may want to tell apart gets its own variant here.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while producing the modded installation
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("could not locate {app_name} (app {app_id}) in {manifest}")]
    InstallNotFound {
        app_id: String,
        app_name: String,
        manifest: Utf8PathBuf,
    },

    #[error("bad status: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("error downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(Utf8PathBuf),

    #[error("illegal file path in archive: {0}")]
    PathTraversal(String),

    #[error("{interpreter} failed ({status}), output: {output}")]
    Interpreter {
        interpreter: String,
        status: String,
        output: String,
    },

    #[error("{0} environment variable not set")]
    MissingEnvVar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_manifest() {
        let err = InstallError::InstallNotFound {
            app_id: "945360".to_string(),
            app_name: "Among Us".to_string(),
            manifest: Utf8PathBuf::from("libraryfolders.vdf"),
        };

        let message = err.to_string();
        assert!(message.contains("Among Us"));
        assert!(message.contains("945360"));
        assert!(message.contains("libraryfolders.vdf"));
    }

    #[test]
    fn test_interpreter_message_carries_output() {
        let err = InstallError::Interpreter {
            interpreter: "cscript".to_string(),
            status: "exit code: 1".to_string(),
            output: "Microsoft VBScript runtime error".to_string(),
        };

        assert!(err.to_string().contains("VBScript runtime error"));
    }
}
