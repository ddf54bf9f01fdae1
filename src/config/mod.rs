pub mod categories;

pub use categories::{default_config_path, CategoryConfig, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
