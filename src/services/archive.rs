//! Zip extraction into the modded copy.
//!
//! Every entry name is joined to the destination root and lexically cleaned before
//! anything is written; a name that lands outside the root (`../../evil.txt`,
//! absolute paths, drive prefixes) aborts the extraction with
//! [`InstallError::PathTraversal`].

use crate::error::InstallError;
use anyhow::{Context, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};

/// Counts of what an extraction wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Extracts every entry of the zip at `archive_path` below `dest_root`.
///
/// Existing files are truncated and overwritten. Stored unix mode bits are
/// applied on unix targets. The first failing entry aborts the remaining ones.
///
/// # Errors
///
/// - [`InstallError::PathTraversal`] for an entry that escapes `dest_root`
/// - the underlying zip or I/O error with the path as context otherwise
pub fn extract_zip(archive_path: &Utf8Path, dest_root: &Utf8Path) -> Result<ExtractStats> {
    tracing::info!("Extracting {} into {}", archive_path, dest_root);

    let file = File::open(archive_path)
        .with_context(|| format!("failed to open zip file {}", archive_path))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("failed to open zip file {}", archive_path))?;

    let root = absolute_clean(dest_root)?;
    let mut stats = ExtractStats::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("failed to read entry {} of {}", index, archive_path))?;

        let target = contained_path(&root, entry.name())?;
        let mode = entry.unix_mode();

        if entry.is_dir() {
            fs::create_dir_all(&target).with_context(|| format!("error creating {}", target))?;
            apply_mode(&target, mode)?;
            stats.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("error creating {}", parent))?;
        }

        let mut out_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target)
            .with_context(|| format!("error creating {}", target))?;

        stats.bytes += io::copy(&mut entry, &mut out_file)
            .with_context(|| format!("error writing {}", target))?;
        drop(out_file);

        apply_mode(&target, mode)?;
        stats.files += 1;
    }

    tracing::info!(
        "Mods extracted successfully into the new folder ({} files, {} directories)",
        stats.files,
        stats.directories
    );
    Ok(stats)
}

/// Resolves an archive entry name below `root`.
///
/// `root` must already be absolute and clean. The result lies strictly inside it.
pub fn contained_path(root: &Utf8Path, entry_name: &str) -> Result<Utf8PathBuf> {
    let target = clean_path(&root.join(entry_name));

    if target == root || !target.starts_with(root) {
        tracing::warn!("Rejecting archive entry outside {}: {}", root, entry_name);
        return Err(InstallError::PathTraversal(entry_name.to_string()).into());
    }

    Ok(target)
}

fn absolute_clean(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("error resolving {}", path))?;
    let absolute = Utf8PathBuf::try_from(absolute)
        .with_context(|| format!("{} is not valid UTF-8", path))?;
    Ok(clean_path(&absolute))
}

/// Lexically normalizes a path: drops `.`, folds `..` into its parent.
///
/// `..` directly below a root or prefix is discarded; leading `..` of a relative
/// path is kept.
pub fn clean_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let last_is_name = matches!(parts.last(), Some(Utf8Component::Normal(_)));
                let last_is_root = matches!(
                    parts.last(),
                    Some(Utf8Component::RootDir | Utf8Component::Prefix(_))
                );
                if last_is_name {
                    parts.pop();
                } else if !last_is_root {
                    parts.push(component);
                }
            }
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    parts.iter().map(|c| c.as_str()).collect()
}

#[cfg(unix)]
fn apply_mode(path: &Utf8Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
            .with_context(|| format!("error setting permissions on {}", path))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Utf8Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
