use crate::error::FinderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

/// Transfer mode enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    pub fn past_tense(self) -> &'static str {
        match self {
            TransferMode::Copy => "Copied",
            TransferMode::Move => "Moved",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Copy => write!(f, "copy"),
            TransferMode::Move => write!(f, "move"),
        }
    }
}

/// What to do when the computed destination file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    #[default]
    Overwrite,
    Skip,
    Error,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(ConflictPolicy::Overwrite),
            "skip" => Ok(ConflictPolicy::Skip),
            "error" => Ok(ConflictPolicy::Error),
            other => Err(format!("unknown conflict policy: {}", other)),
        }
    }
}

/// Classification of a per-file transfer failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    PermissionDenied,
    NotFound,
    AlreadyExists,
    StorageFull,
    OutsideSearchRoot,
    SameFile,
    Other,
}

impl From<&io::Error> for FailureKind {
    fn from(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            io::ErrorKind::NotFound => FailureKind::NotFound,
            io::ErrorKind::AlreadyExists => FailureKind::AlreadyExists,
            io::ErrorKind::StorageFull => FailureKind::StorageFull,
            _ => FailureKind::Other,
        }
    }
}

impl From<&FinderError> for FailureKind {
    fn from(error: &FinderError) -> Self {
        match error {
            FinderError::Transfer { source, .. } => FailureKind::from(source),
            FinderError::OutsideSearchRoot { .. } => FailureKind::OutsideSearchRoot,
            FinderError::DestinationExists { .. } => FailureKind::AlreadyExists,
            FinderError::SameFile { .. } => FailureKind::SameFile,
            _ => FailureKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferStatus {
    Transferred,
    Skipped { reason: String },
    Failed { kind: FailureKind, error: String },
}

/// Result of transferring a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(flatten)]
    pub status: TransferStatus,
}

impl TransferOutcome {
    pub fn transferred(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            status: TransferStatus::Transferred,
        }
    }

    pub fn skipped(source: PathBuf, destination: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            source,
            destination,
            status: TransferStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(source: PathBuf, destination: PathBuf, error: &FinderError) -> Self {
        Self {
            source,
            destination,
            status: TransferStatus::Failed {
                kind: FailureKind::from(error),
                error: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, TransferStatus::Transferred)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, TransferStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_policy_from_str() {
        assert_eq!("Skip".parse::<ConflictPolicy>(), Ok(ConflictPolicy::Skip));
        assert_eq!(
            "overwrite".parse::<ConflictPolicy>(),
            Ok(ConflictPolicy::Overwrite)
        );
        assert!("merge".parse::<ConflictPolicy>().is_err());
    }

    #[test]
    fn test_failure_kind_from_errors() {
        let denied = FinderError::Transfer {
            from: PathBuf::from("a"),
            to: PathBuf::from("b"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(FailureKind::from(&denied), FailureKind::PermissionDenied);

        let exists = FinderError::DestinationExists {
            path: PathBuf::from("b"),
        };
        assert_eq!(FailureKind::from(&exists), FailureKind::AlreadyExists);
    }

    #[test]
    fn test_failed_outcome_serializes_flat() {
        let outcome = TransferOutcome::failed(
            PathBuf::from("/src/a.txt"),
            PathBuf::from("/dst/a.txt"),
            &FinderError::SameFile {
                path: PathBuf::from("/src/a.txt"),
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "same_file");
        assert_eq!(json["source"], "/src/a.txt");
        assert!(outcome.is_error());
    }
}
