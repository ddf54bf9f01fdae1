use crate::error::{DirectoryRole, FinderError, Result};
use crate::models::{ConflictPolicy, TransferMode, TransferOutcome, TransferStatus};
use crate::utils::{copy_file_with_metadata, destination_for, ensure_parent_dirs, is_same_file, move_file};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Configuration for transfer operations
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub on_conflict: ConflictPolicy,
    pub preserve_metadata: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            on_conflict: ConflictPolicy::Overwrite,
            preserve_metadata: true,
        }
    }
}

/// Copy or move `sources` under `destination_root`, keeping each file's path
/// relative to `search_root`.
///
/// Precondition failures (empty selection, invalid destination) are returned
/// before any file is touched. Per-file failures are recorded in the report
/// and never stop the batch.
pub fn transfer_files(
    sources: &[PathBuf],
    search_root: &Path,
    destination_root: &Path,
    mode: TransferMode,
    config: &TransferConfig,
) -> Result<TransferReport> {
    if sources.is_empty() {
        return Err(FinderError::EmptySelection);
    }

    if !destination_root.is_dir() {
        return Err(FinderError::InvalidDirectory {
            role: DirectoryRole::Destination,
            path: destination_root.to_path_buf(),
        });
    }

    info!(
        "Starting {} of {} files to '{}', keeping directory structure",
        mode,
        sources.len(),
        destination_root.display()
    );

    let started_at = Utc::now();
    let outcomes: Vec<TransferOutcome> = sources
        .iter()
        .map(|source| transfer_one(source, search_root, destination_root, mode, config))
        .collect();

    let report = TransferReport {
        mode,
        outcomes,
        started_at,
        finished_at: Utc::now(),
    };

    info!(
        "Operation '{}' completed. Successful: {}, Skipped: {}, Failed: {}",
        mode,
        report.successful(),
        report.skipped(),
        report.failed()
    );

    if report.requires_rescan() {
        info!("Files were moved; run a new search before reusing the previous results");
    }

    Ok(report)
}

fn transfer_one(
    source: &Path,
    search_root: &Path,
    destination_root: &Path,
    mode: TransferMode,
    config: &TransferConfig,
) -> TransferOutcome {
    let destination = match destination_for(source, search_root, destination_root) {
        Ok(destination) => destination,
        Err(e) => {
            error!("Failed to {} '{}': {}", mode, source.display(), e);
            return TransferOutcome::failed(source.to_path_buf(), PathBuf::new(), &e);
        }
    };

    match apply_transfer(source, &destination, mode, config) {
        Ok(true) => {
            let relative = destination
                .strip_prefix(destination_root)
                .unwrap_or(&destination);
            info!(
                "{}: '{}' to '{}'",
                mode.past_tense(),
                relative.display(),
                destination.parent().unwrap_or(destination_root).display()
            );
            TransferOutcome::transferred(source.to_path_buf(), destination)
        }
        Ok(false) => {
            debug!(
                "Skipped {} -> {}: destination already exists",
                source.display(),
                destination.display()
            );
            TransferOutcome::skipped(source.to_path_buf(), destination, "destination already exists")
        }
        Err(e) => {
            error!("Failed to {} '{}': {}", mode, source.display(), e);
            TransferOutcome::failed(source.to_path_buf(), destination, &e)
        }
    }
}

/// Returns `Ok(false)` when the existing-file policy chose to skip
fn apply_transfer(
    source: &Path,
    destination: &Path,
    mode: TransferMode,
    config: &TransferConfig,
) -> Result<bool> {
    let io_error = |e: io::Error| FinderError::Transfer {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    };

    let metadata = fs::metadata(source).map_err(io_error)?;
    if metadata.is_dir() {
        return Err(io_error(io::Error::new(
            io::ErrorKind::Other,
            "source is a directory",
        )));
    }

    if destination.exists() {
        if is_same_file(source, destination) {
            return Err(FinderError::SameFile {
                path: source.to_path_buf(),
            });
        }
        match config.on_conflict {
            ConflictPolicy::Overwrite => {}
            ConflictPolicy::Skip => return Ok(false),
            ConflictPolicy::Error => {
                return Err(FinderError::DestinationExists {
                    path: destination.to_path_buf(),
                })
            }
        }
    }

    ensure_parent_dirs(destination).map_err(io_error)?;

    match mode {
        TransferMode::Copy => copy_file_with_metadata(source, destination, config.preserve_metadata),
        TransferMode::Move => move_file(source, destination, config.preserve_metadata),
    }
    .map_err(io_error)?;

    Ok(true)
}

/// Report structure for transfer operations
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub mode: TransferMode,
    pub outcomes: Vec<TransferOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TransferReport {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, TransferStatus::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_error()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TransferOutcome> {
        self.outcomes.iter().filter(|o| o.is_error())
    }

    pub fn total_processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            self.successful() as f64 / total as f64
        }
    }

    /// A move invalidates any search result that listed the moved files
    pub fn requires_rescan(&self) -> bool {
        self.mode == TransferMode::Move && self.successful() > 0
    }
}
