use crate::error::{DirectoryRole, FinderError, Result};
use crate::models::{ExtensionSet, SearchResult};
use crate::utils::walk_matching_files;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for search operations
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub follow_links: bool,
}

/// Recursively search `root` for files whose name ends with one of `extensions`.
///
/// The root must be an existing directory. Subtrees that cannot be read are
/// skipped and listed in [`SearchResult::skipped`]. Results come back in walk
/// order.
pub fn search_files<P: AsRef<Path>>(
    root: P,
    extensions: &ExtensionSet,
    config: &SearchConfig,
) -> Result<SearchResult> {
    let root = root.as_ref();

    if !root.is_dir() {
        return Err(FinderError::InvalidDirectory {
            role: DirectoryRole::SearchRoot,
            path: root.to_path_buf(),
        });
    }

    if extensions.is_empty() {
        return Err(FinderError::NoExtensions);
    }

    info!(
        "Searching '{}' for extensions: {}",
        root.display(),
        extensions
    );

    let (files, skipped) = walk_matching_files(root, extensions, config.follow_links);

    if !skipped.is_empty() {
        warn!("{} entries could not be read and were skipped", skipped.len());
    }

    if files.is_empty() {
        info!("No files matched the selected extensions");
    } else {
        info!("Found {} matching files", files.len());
    }

    Ok(SearchResult {
        root: root.to_path_buf(),
        files,
        skipped,
    })
}
