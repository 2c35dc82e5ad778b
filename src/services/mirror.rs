use crate::error::InstallError;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Counts of what a mirror pass copied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Removes a stale copy at `path`, if any.
///
/// # Returns
/// `true` if something was deleted
pub fn remove_stale_dir(path: &Utf8Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    tracing::info!("Existing {} folder found, deleting...", path);
    fs::remove_dir_all(path)
        .with_context(|| format!("error deleting existing folder {}", path))?;
    Ok(true)
}

/// Recursively copies `src` into `dst`, carrying permission bits of every file and directory.
///
/// Entries are visited in directory listing order. The first failure aborts the copy
/// and leaves `dst` partially populated.
///
/// # Errors
///
/// [`InstallError::NotADirectory`] if `src` is not a directory, otherwise the
/// underlying I/O error with the offending path as context.
pub fn mirror_dir(src: &Utf8Path, dst: &Utf8Path) -> Result<MirrorStats> {
    let mut stats = MirrorStats::default();
    mirror_dir_into(src, dst, &mut stats)?;

    tracing::debug!(
        "Mirrored {} -> {}: {} files, {} directories, {} bytes",
        src,
        dst,
        stats.files,
        stats.directories,
        stats.bytes
    );
    Ok(stats)
}

fn mirror_dir_into(src: &Utf8Path, dst: &Utf8Path, stats: &mut MirrorStats) -> Result<()> {
    let src_meta = fs::metadata(src).with_context(|| format!("error reading {}", src))?;
    if !src_meta.is_dir() {
        return Err(InstallError::NotADirectory(src.to_path_buf()).into());
    }

    fs::create_dir_all(dst).with_context(|| format!("error creating {}", dst))?;
    stats.directories += 1;

    for entry in src.read_dir_utf8().with_context(|| format!("error listing {}", src))? {
        let entry = entry.with_context(|| format!("error listing {}", src))?;
        let src_path = entry.path();
        let dst_path: Utf8PathBuf = dst.join(entry.file_name());

        let file_type = entry
            .file_type()
            .with_context(|| format!("error reading {}", src_path))?;

        if file_type.is_dir() {
            mirror_dir_into(src_path, &dst_path, stats)?;
        } else {
            stats.bytes += copy_file(src_path, &dst_path)?;
            stats.files += 1;
        }
    }

    // Applied last so a read-only source directory does not block its own population.
    fs::set_permissions(dst, src_meta.permissions())
        .with_context(|| format!("error setting permissions on {}", dst))?;

    Ok(())
}

/// Copies bytes and permission bits of a single file.
fn copy_file(src: &Utf8Path, dst: &Utf8Path) -> Result<u64> {
    let bytes = fs::copy(src, dst).with_context(|| format!("error copying {} to {}", src, dst))?;

    let permissions = fs::metadata(src)
        .with_context(|| format!("error reading {}", src))?
        .permissions();
    fs::set_permissions(dst, permissions)
        .with_context(|| format!("error setting permissions on {}", dst))?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_mirror_copies_nested_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let src = root.join("Among Us");
        fs::create_dir_all(src.join("Among Us_Data/Managed")).unwrap();
        fs::write(src.join("Among Us.exe"), b"MZ").unwrap();
        fs::write(src.join("Among Us_Data/Managed/Assembly-CSharp.dll"), b"dll").unwrap();

        let dst = root.join("Among Us Modded");
        let stats = mirror_dir(&src, &dst).unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.directories, 3);
        assert_eq!(stats.bytes, 5);
        assert_eq!(fs::read(dst.join("Among Us.exe")).unwrap(), b"MZ");
        assert_eq!(
            fs::read(dst.join("Among Us_Data/Managed/Assembly-CSharp.dll")).unwrap(),
            b"dll"
        );
    }

    #[test]
    fn test_mirror_rejects_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        fs::write(root.join("file.txt"), b"x").unwrap();

        let err = mirror_dir(&root.join("file.txt"), &root.join("out")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::NotADirectory(_))
        ));
        assert!(!root.join("out").exists());
    }

    #[test]
    fn test_mirror_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        assert!(mirror_dir(&root.join("missing"), &root.join("out")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_mirror_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let src = root.join("src");
        fs::create_dir_all(src.join("bin")).unwrap();
        fs::write(src.join("bin/run.sh"), b"#!/bin/sh\n").unwrap();
        fs::set_permissions(src.join("bin/run.sh"), fs::Permissions::from_mode(0o750)).unwrap();
        fs::set_permissions(src.join("bin"), fs::Permissions::from_mode(0o711)).unwrap();

        let dst = root.join("dst");
        mirror_dir(&src, &dst).unwrap();

        let file_mode = fs::metadata(dst.join("bin/run.sh")).unwrap().permissions().mode();
        let dir_mode = fs::metadata(dst.join("bin")).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o750);
        assert_eq!(dir_mode & 0o777, 0o711);
    }

    #[test]
    fn test_remove_stale_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let stale = root.join("Among Us Modded");
        fs::create_dir_all(stale.join("BepInEx")).unwrap();
        fs::write(stale.join("BepInEx/old.dll"), b"old").unwrap();

        assert!(remove_stale_dir(&stale).unwrap());
        assert!(!stale.exists());
        assert!(!remove_stale_dir(&stale).unwrap());
    }
}
