pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::{default_config_path, CategoryConfig};
pub use error::{DirectoryRole, FinderError};
pub use models::{
    ConflictPolicy, ExtensionSet, FailureKind, SearchResult, SkippedEntry, TransferMode,
    TransferOutcome, TransferStatus,
};
pub use services::{
    search_files, transfer_files, SearchConfig, TransferConfig, TransferReport,
};

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub transfer: TransferConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            transfer: TransferConfig::default(),
            log_level: "info".to_string(),
        }
    }
}
