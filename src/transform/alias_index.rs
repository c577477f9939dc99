//! Reverse lookup from page id to the exported document that declares it.

use crate::constants::{ALIAS_MARKER, ALIAS_SCAN_LINES, ALIAS_SCAN_WORKERS, MARKDOWN_EXTENSION};
use crate::types::simple_id;
use crossbeam::channel;
use dashmap::DashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use walkdir::WalkDir;

/// Alias to filename (without extension) of previously exported documents.
#[derive(Debug, Default)]
pub struct AliasIndex {
    entries: DashMap<String, String>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, alias: impl Into<String>, filename: impl Into<String>) {
        self.entries.insert(alias.into(), filename.into());
    }

    pub fn get(&self, alias: &str) -> Option<String> {
        self.entries.get(alias).map(|entry| entry.value().clone())
    }

    /// The document name registered for `id`, or the id without dashes.
    pub fn alias_or_id(&self, id: &str) -> String {
        let id = simple_id(id);
        self.get(&id).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let index = Self::new();
        for (alias, filename) in iter {
            index.insert(alias, filename);
        }
        index
    }
}

/// Scans every Markdown file below `root` for an alias line.
///
/// The directory walk feeds a bounded queue drained by a fixed pool of
/// readers; the call returns once all of them are done. Unreadable
/// entries are logged and skipped. An empty path yields an empty index.
pub fn build_alias_index(root: &Path) -> AliasIndex {
    let index = AliasIndex::new();
    if root.as_os_str().is_empty() {
        return index;
    }

    let (sender, receiver) = channel::bounded::<PathBuf>(ALIAS_SCAN_WORKERS);

    thread::scope(|scope| {
        for _ in 0..ALIAS_SCAN_WORKERS {
            let receiver = receiver.clone();
            let index = &index;
            scope.spawn(move || {
                for path in receiver {
                    match read_alias(&path) {
                        Ok(Some(alias)) => {
                            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                                index.insert(alias, stem);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                    }
                }
            });
        }

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error walking {}: {}", root.display(), e);
                    continue;
                }
            };
            let is_markdown = entry
                .path()
                .extension()
                .is_some_and(|ext| ext == MARKDOWN_EXTENSION);
            if entry.file_type().is_file() && is_markdown && sender.send(entry.into_path()).is_err()
            {
                break;
            }
        }
        drop(sender);
    });

    log::debug!(
        "Indexed {} aliases under {}",
        index.len(),
        root.display()
    );
    index
}

/// Returns the alias declared in the first lines of `path`, if any.
fn read_alias(path: &Path) -> io::Result<Option<String>> {
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines().take(ALIAS_SCAN_LINES) {
        let line = line?;
        if let Some(alias) = line.strip_prefix(ALIAS_MARKER) {
            return Ok(Some(alias.trim().to_string()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builds_index_from_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("My Note.md"),
            "---\naliases: abc123\ntags: x\n---\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested").join("Deep.md"),
            "---\naliases: def456\n---\n",
        )
        .unwrap();

        let index = build_alias_index(dir.path());
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("abc123").as_deref(), Some("My Note"));
        assert_eq!(index.get("def456").as_deref(), Some("Deep"));
    }

    #[test]
    fn test_only_leading_lines_are_searched() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("late.md"),
            "---\ntitle: a\ntags: b\naliases: too-late\n---\n",
        )
        .unwrap();
        fs::write(dir.path().join("other.txt"), "aliases: not-markdown\n").unwrap();

        let index = build_alias_index(dir.path());
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_root_skips_scan() {
        assert!(build_alias_index(Path::new("")).is_empty());
    }

    #[test]
    fn test_missing_root_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(build_alias_index(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_alias_or_id_strips_dashes() {
        let index: AliasIndex = [("abc123", "My Note")].into_iter().collect();
        assert_eq!(index.alias_or_id("abc123"), "My Note");
        assert_eq!(index.alias_or_id("abc-124"), "abc124");
    }
}
