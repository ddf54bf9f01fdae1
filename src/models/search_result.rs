use crate::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Entry the walk could not read and left out of the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Files found by one search, in directory-walk order.
///
/// Indices handed out by [`SearchResult::display_entries`] are only meaningful
/// for this value; a new search or a move makes them stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Path of a result relative to the search root, as shown to the user
    pub fn relative(&self, index: usize) -> Option<&Path> {
        self.files
            .get(index)
            .map(|path| path.strip_prefix(&self.root).unwrap_or(path))
    }

    pub fn display_entries(&self) -> impl Iterator<Item = (usize, &Path)> + '_ {
        (0..self.files.len()).filter_map(move |index| self.relative(index).map(|rel| (index, rel)))
    }

    /// Map selected list positions back to source paths.
    ///
    /// Positions are returned in list order with duplicates collapsed.
    pub fn select(&self, indices: &[usize]) -> Result<Vec<PathBuf>> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        sorted
            .into_iter()
            .map(|index| {
                self.files
                    .get(index)
                    .cloned()
                    .ok_or(FinderError::SelectionOutOfRange {
                        index,
                        len: self.files.len(),
                    })
            })
            .collect()
    }

    pub fn select_all(&self) -> Vec<PathBuf> {
        self.files.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchResult {
        SearchResult {
            root: PathBuf::from("/src"),
            files: vec![
                PathBuf::from("/src/a.txt"),
                PathBuf::from("/src/sub/b.txt"),
                PathBuf::from("/src/sub/deep/c.txt"),
            ],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_display_entries_are_root_relative() {
        let result = sample();
        let entries: Vec<_> = result.display_entries().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], (1, Path::new("sub/b.txt")));
        assert_eq!(entries[2], (2, Path::new("sub/deep/c.txt")));
    }

    #[test]
    fn test_select_maps_indices_in_list_order() {
        let result = sample();
        let selected = result.select(&[2, 0, 2]).unwrap();
        assert_eq!(
            selected,
            vec![PathBuf::from("/src/a.txt"), PathBuf::from("/src/sub/deep/c.txt")]
        );
    }

    #[test]
    fn test_select_out_of_range() {
        let result = sample();
        let err = result.select(&[0, 7]).unwrap_err();
        assert!(matches!(
            err,
            FinderError::SelectionOutOfRange { index: 7, len: 3 }
        ));
    }

    #[test]
    fn test_empty_result() {
        let result = SearchResult {
            root: PathBuf::from("/nothing"),
            files: Vec::new(),
            skipped: Vec::new(),
        };
        assert!(result.is_empty());
        assert!(result.relative(0).is_none());
        assert!(result.select(&[]).unwrap().is_empty());
    }
}
