//! Services module - the individual steps of an install run.
//!
//! Each step is a plain function (or, for the shortcut, a small trait) that takes
//! explicit paths and returns an `anyhow::Result`. None of them keep state between
//! calls; [`Installer`](crate::installer::Installer) sequences them.
//!
//! # Components
//!
//! - [`library`]: Finds the game's install directory in Steam's `libraryfolders.vdf`
//! - [`fetcher`]: Downloads the mod package over HTTP(S)
//! - [`mirror`]: Deletes a stale modded copy and mirrors the install directory
//! - [`archive`]: Extracts the package into the copy, refusing entries outside it
//! - [`shortcut`]: Writes a desktop shortcut via the Windows Script Host
//! - [`cache`]: Clears the game's cached data under the user profile
//!
//! All I/O is blocking except the download, which runs on the tokio runtime
//! owned by `main`.

pub mod archive;
pub mod cache;
pub mod fetcher;
pub mod library;
pub mod mirror;
pub mod shortcut;

pub use archive::{ExtractStats, extract_zip};
pub use cache::clear_cache_dir;
pub use fetcher::download_file;
pub use library::{resolve_install_dir, resolve_install_dir_from_str};
pub use mirror::{MirrorStats, mirror_dir, remove_stale_dir};
pub use shortcut::{CscriptShortcutWriter, ShortcutRequest, ShortcutWriter};
