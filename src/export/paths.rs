// src/export/paths.rs
//! Filename and path helpers for exported files.

use crate::constants::MARKDOWN_EXTENSION;
use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Replaces characters that are illegal in filenames on common filesystems.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `<directory>/<stem>.md`
pub fn markdown_path(directory: &Path, stem: &str) -> PathBuf {
    directory.join(format!("{}.{}", stem, MARKDOWN_EXTENSION))
}

/// Path of `target` relative to `base`, with forward slashes for Markdown.
pub fn relative_path(target: &Path, base: &Path) -> Result<String, AppError> {
    let relative = pathdiff::diff_paths(target, base).ok_or_else(|| {
        AppError::PathError(format!(
            "Could not calculate relative path from {} to {}",
            base.display(),
            target.display()
        ))
    })?;

    Ok(relative.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
        assert_eq!(sanitize_filename("  Trip notes  "), "Trip notes");
        assert_eq!(sanitize_filename("line\nbreak"), "line_break");
    }

    #[test]
    fn test_relative_path_to_sibling_directory() {
        let rel = relative_path(
            Path::new("/vault/assets/abc.png"),
            Path::new("/vault/notes"),
        )
        .unwrap();
        assert_eq!(rel, "../assets/abc.png");
    }

    #[test]
    fn test_relative_path_inside_base() {
        let rel = relative_path(Path::new("/vault/img/x.gif"), Path::new("/vault")).unwrap();
        assert_eq!(rel, "img/x.gif");
    }

    #[test]
    fn test_markdown_path() {
        assert_eq!(
            markdown_path(Path::new("/out"), "abc"),
            PathBuf::from("/out/abc.md")
        );
    }
}
