use crate::error::{FinderError, Result};
use crate::models::{ExtensionSet, SkippedEntry};
use filetime::{set_file_times, FileTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively list files under `root` whose name matches one of the extensions.
///
/// Unreadable entries are skipped and returned alongside the matches so the
/// caller can report them; the walk itself never aborts.
pub fn walk_matching_files<P: AsRef<Path>>(
    root: P,
    extensions: &ExtensionSet,
    follow_links: bool,
) -> (Vec<PathBuf>, Vec<SkippedEntry>) {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root.as_ref()).follow_links(follow_links) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.as_ref().to_path_buf());
                warn!("Skipping unreadable entry {}: {}", path.display(), e);
                skipped.push(SkippedEntry {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !is_listable_file(&entry) {
            continue;
        }

        if extensions.matches(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }

    (files, skipped)
}

/// Anything that is not a directory counts as a file, including symlinks
/// whose target is not a directory.
fn is_listable_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_dir() {
        return false;
    }
    !(file_type.is_symlink() && entry.path().is_dir())
}

/// Destination of `source` under `destination_root`, keeping its path relative
/// to `search_root`.
/// Pure function
pub fn destination_for(
    source: &Path,
    search_root: &Path,
    destination_root: &Path,
) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(search_root)
        .map_err(|_| FinderError::OutsideSearchRoot {
            path: source.to_path_buf(),
            root: search_root.to_path_buf(),
        })?;

    if relative.as_os_str().is_empty() {
        return Err(FinderError::OutsideSearchRoot {
            path: source.to_path_buf(),
            root: search_root.to_path_buf(),
        });
    }

    Ok(destination_root.join(relative))
}

/// True when both paths exist and name the same underlying file, including
/// hard links and symlinks to it
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    same_file::is_same_file(a, b).unwrap_or(false)
}

pub fn ensure_parent_dirs(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Copy file bytes and permissions, then carry over access and modification times
pub fn copy_file_with_metadata(source: &Path, destination: &Path, preserve_times: bool) -> io::Result<()> {
    fs::copy(source, destination)?;

    if preserve_times {
        let metadata = fs::metadata(source)?;
        let accessed = FileTime::from_last_access_time(&metadata);
        let modified = FileTime::from_last_modification_time(&metadata);
        set_file_times(destination, accessed, modified)?;
    }

    Ok(())
}

/// Relocate a file, falling back to copy-then-delete when a rename is not
/// possible (different volumes, for instance).
pub fn move_file(source: &Path, destination: &Path, preserve_times: bool) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(rename_error) => {
            debug!(
                "Rename {} -> {} failed ({}), falling back to copy and delete",
                source.display(),
                destination.display(),
                rename_error
            );
            copy_then_remove(source, destination, preserve_times)
        }
    }
}

fn copy_then_remove(source: &Path, destination: &Path, preserve_times: bool) -> io::Result<()> {
    copy_file_with_metadata(source, destination, preserve_times)?;
    fs::remove_file(source).map_err(|e| copied_but_not_removed(destination, e))
}

/// The copy already landed; say so instead of reporting a bare removal error
fn copied_but_not_removed(destination: &Path, error: io::Error) -> io::Error {
    io::Error::new(
        error.kind(),
        format!(
            "a copy now exists at {} but the original could not be removed: {}",
            destination.display(),
            error
        ),
    )
}
