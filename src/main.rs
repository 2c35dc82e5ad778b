//! AmongUs Modder - command-line entry point.
//!
//! # Execution Flow
//!
//! 1. Parse arguments
//! 2. Initialize logging → logs/amongus-modder.<date>
//! 3. Load `installer.yaml` from the config directory (defaults when absent,
//!    `MODINSTALL_*` environment variables override either)
//! 4. Capture the user profile and working directory
//! 5. Run the install steps on a single-threaded tokio runtime
//!
//! Any failure is logged and returned; nothing distinguishes one failure from
//! another in the exit status.

use amongus_modder::services::CscriptShortcutWriter;
use amongus_modder::{APP_NAME, ConfigManager, Installer, UserEnvironment, VERSION};
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

/// Create a modded copy of Among Us with The Other Roles installed
#[derive(Debug, Parser)]
#[command(name = "amongus-modder", version, about)]
struct Cli {
    /// Directory holding installer.yaml
    #[arg(long, default_value = "ModInstaller Data")]
    config_dir: Utf8PathBuf,

    /// Directory for rotating log files
    #[arg(long, default_value = "logs")]
    log_dir: Utf8PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Write the effective configuration to installer.yaml and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard =
        amongus_modder::logging::setup_logging(&cli.log_dir, APP_NAME, cli.debug, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let config = config_manager.load_config()?;

    if cli.write_default_config {
        config_manager.save_config(&config)?;
        return Ok(());
    }

    let env = UserEnvironment::from_process(&config.profile_env)?;

    // Everything runs in sequence; the runtime exists for the HTTP client
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let installer = Installer::new(config, env, CscriptShortcutWriter::new());
    let result = runtime.block_on(installer.run());

    match result {
        Ok(report) => {
            tracing::info!(
                "Done: {} is ready, shortcut at {}",
                report.modded_dir,
                report.shortcut_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Install failed: {:#}", e);
            Err(e)
        }
    }
}
