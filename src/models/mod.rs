pub mod extension_set;
pub mod search_result;
pub mod transfer;

pub use extension_set::ExtensionSet;
pub use search_result::{SearchResult, SkippedEntry};
pub use transfer::{ConflictPolicy, FailureKind, TransferMode, TransferOutcome, TransferStatus};
