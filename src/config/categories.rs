use crate::error::{FinderError, Result};
use crate::models::ExtensionSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "FILE_FINDER_CONFIG";

/// Category name to extension list mapping, persisted as `{"file_types": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub file_types: BTreeMap<String, Vec<String>>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let categories: [(&str, &[&str]); 7] = [
            ("Music", &[".mp3", ".wav", ".ogg", ".flac", ".aac", ".m4a"]),
            ("Videos", &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv"]),
            (
                "Documents",
                &[".doc", ".docx", ".pdf", ".xls", ".xlsx", ".ppt", ".pptx", ".txt", ".rtf"],
            ),
            ("Images", &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"]),
            ("Compressed Archives", &[".zip", ".rar", ".7z", ".tar.gz"]),
            ("Executables", &[".exe", ".msi", ".dmg", ".app"]),
            ("Code", &[".py", ".js", ".html", ".css", ".java", ".c", ".cpp"]),
        ];

        Self {
            file_types: categories
                .iter()
                .map(|(name, exts)| {
                    (
                        name.to_string(),
                        exts.iter().map(|e| e.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl CategoryConfig {
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.file_types.keys().map(String::as_str)
    }

    /// Extensions of a category, looked up exactly first and then ignoring ASCII case
    pub fn extensions_for(&self, category: &str) -> Option<&[String]> {
        self.file_types
            .get(category)
            .or_else(|| {
                self.file_types
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(category))
                    .map(|(_, exts)| exts)
            })
            .map(Vec::as_slice)
    }

    /// Flatten the selected categories into one extension set
    pub fn resolve<S: AsRef<str>>(&self, categories: &[S]) -> Result<ExtensionSet> {
        let mut extensions = ExtensionSet::default();
        for category in categories {
            let category = category.as_ref();
            let exts = self
                .extensions_for(category)
                .ok_or_else(|| FinderError::UnknownCategory(category.to_string()))?;
            extensions.extend(exts);
        }
        Ok(extensions)
    }

    /// Load the configuration from `path`, writing the defaults when the file is
    /// missing, unreadable as JSON, or lacks a `file_types` object.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(
                "Configuration file '{}' not found, creating it with defaults",
                path.display()
            );
            return Self::create_default(path);
        }

        let contents = fs::read_to_string(path).map_err(|e| FinderError::Configuration {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match serde_json::from_str::<CategoryConfig>(&contents) {
            Ok(config) => {
                info!(
                    "Loaded {} categories from '{}'",
                    config.file_types.len(),
                    path.display()
                );
                Ok(config)
            }
            Err(e) => {
                warn!(
                    "Configuration file '{}' is invalid ({}), recreating it with defaults",
                    path.display(),
                    e
                );
                Self::create_default(path)
            }
        }
    }

    /// Write the default configuration to `path`, replacing any existing file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::default();
        config.save(path)?;
        info!("Created default configuration at '{}'", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let to_config_error = |message: String| FinderError::Configuration {
            path: path.to_path_buf(),
            message,
        };

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| to_config_error(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| to_config_error(e.to_string()))?;
        }
        fs::write(path, buffer).map_err(|e| to_config_error(e.to_string()))
    }
}

/// Where the category configuration lives when no path is given explicitly:
/// `FILE_FINDER_CONFIG` if set, otherwise `config.json` next to the executable.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.json");

        let config = CategoryConfig::load_or_create(&path).unwrap();

        assert_eq!(config, CategoryConfig::default());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"file_types\""));
        assert!(written.contains("\n    \"file_types\""));
    }

    #[test]
    fn test_existing_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"file_types": {"Logs": [".log", ".LOG.1"]}}"#).unwrap();

        let config = CategoryConfig::load_or_create(&path).unwrap();

        assert_eq!(config.category_names().collect::<Vec<_>>(), vec!["Logs"]);
        let set = config.resolve(&["logs"]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![".log", ".log.1"]);
    }

    #[test]
    fn test_corrupt_or_wrong_shape_is_recreated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        for contents in ["{ not json", r#"{"other": 1}"#, r#"{"file_types": [".mp3"]}"#] {
            fs::write(&path, contents).unwrap();
            let config = CategoryConfig::load_or_create(&path).unwrap();
            assert_eq!(config, CategoryConfig::default());
            let reread: CategoryConfig =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(reread, config);
        }
    }

    #[test]
    fn test_resolve_flattens_and_rejects_unknown() {
        let config = CategoryConfig::default();

        let set = config.resolve(&["Music", "Compressed Archives"]).unwrap();
        assert!(set.matches("song.FLAC"));
        assert!(set.matches("backup.tar.gz"));
        assert!(!set.matches("photo.jpg"));

        let err = config.resolve(&["Music", "Podcasts"]).unwrap_err();
        assert!(matches!(err, FinderError::UnknownCategory(name) if name == "Podcasts"));
    }

    #[test]
    fn test_unwritable_location_is_a_configuration_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = CategoryConfig::load_or_create(blocker.join("config.json")).unwrap_err();
        assert!(matches!(err, FinderError::Configuration { .. }));
    }
}
