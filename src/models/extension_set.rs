use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase filename suffixes a search matches against.
///
/// Entries are lowercased once on construction and otherwise kept verbatim, so
/// an empty suffix matches every name. Duplicates collapse to the first
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(extensions);
        set
    }

    /// First extension the file name ends with, compared case-insensitively
    pub fn matching_extension(&self, file_name: &str) -> Option<&str> {
        let name = file_name.to_lowercase();
        self.extensions
            .iter()
            .find(|ext| name.ends_with(ext.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.matching_extension(file_name).is_some()
    }

    pub fn extend<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = ext.as_ref().to_lowercase();
            if !self.extensions.contains(&ext) {
                self.extensions.push(ext);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(value: ExtensionSet) -> Self {
        value.extensions
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extensions.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_dedups() {
        let set = ExtensionSet::new([".MP3", ".Wav", ".mp3"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![".mp3", ".wav"]);
    }

    #[test]
    fn test_entries_are_not_trimmed_or_dropped() {
        let padded = ExtensionSet::new([" .txt"]);
        assert!(!padded.matches("a.txt"));
        assert!(padded.matches("a .TXT"));

        let everything = ExtensionSet::new([""]);
        assert_eq!(everything.len(), 1);
        assert!(everything.matches("x.bin"));
        assert!(everything.matches("no_extension"));
    }

    #[test]
    fn test_matches_is_case_insensitive_both_ways() {
        let set = ExtensionSet::new([".TXT"]);
        assert!(set.matches("notes.txt"));
        assert!(set.matches("NOTES.TxT"));
        assert!(!set.matches("notes.txt.bak"));
        assert!(!set.matches("notes"));
    }

    #[test]
    fn test_first_matching_extension_wins() {
        let set = ExtensionSet::new([".tar.gz", ".gz"]);
        assert_eq!(set.matching_extension("backup.TAR.GZ"), Some(".tar.gz"));
        assert_eq!(set.matching_extension("log.gz"), Some(".gz"));
    }

    #[test]
    fn test_suffix_matching_is_not_extension_parsing() {
        // Whole-suffix comparison: a bare "txt" also matches names without a dot
        let set = ExtensionSet::new(["txt"]);
        assert!(set.matches("readme.txt"));
        assert!(set.matches("mytxt"));
    }

    #[test]
    fn test_extend_keeps_order_and_dedups() {
        let mut set = ExtensionSet::new([".jpg"]);
        set.extend([".PNG", ".jpg"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![".jpg", ".png"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serde_as_plain_list() {
        let set: ExtensionSet = serde_json::from_str(r#"[".Mp4", ".mkv"]"#).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"[".mp4",".mkv"]"#);
    }
}
