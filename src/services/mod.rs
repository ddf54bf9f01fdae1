pub mod file_search;
pub mod file_transfer;

pub use file_search::{search_files, SearchConfig};
pub use file_transfer::{transfer_files, TransferConfig, TransferReport};
