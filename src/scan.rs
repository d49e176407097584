//! Input enumeration.
//!
//! Turns either a directory or an explicit list of paths into the ordered
//! [`BatchItem`] list the batch driver consumes.
//!
//! ## Directory mode
//!
//! Only files directly inside the directory are considered (no recursion).
//! A file is an image if its extension, compared case-insensitively, is one of
//! [`SUPPORTED_EXTENSIONS`]:
//!
//! ```text
//! photos/
//! ├── dawn.JPG          ✓
//! ├── dusk.jpeg         ✓
//! ├── logo.png          ✓
//! ├── scan.bmp          ✓
//! ├── loop.gif          ✓
//! ├── notes.txt         ✗ wrong extension
//! ├── .thumb.jpg        ✗ hidden
//! └── archive/          ✗ directories are not entered
//!     └── old.jpg
//! ```
//!
//! Items are sorted by file name so every run processes them in the same order.
//!
//! ## Explicit mode
//!
//! Paths are kept in the order given. No extension filtering happens here: the
//! operator picked the files, and anything undecodable fails at item level.

use crate::types::BatchItem;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions accepted by [`discover_images`], lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// True if the path's extension is a supported image extension (any case).
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

/// All supported images directly inside `dir`, sorted by file name.
pub fn discover_images(dir: &Path) -> Result<Vec<BatchItem>, ScanError> {
    if !std::fs::metadata(dir)?.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && !is_hidden(path) && has_supported_extension(path) {
            paths.push(path.to_path_buf());
        }
    }

    debug!("found {} images in {}", paths.len(), dir.display());
    Ok(paths.iter().map(|p| BatchItem::from_path(p)).collect())
}

/// Items for an explicit list of files, in the given order.
pub fn items_from_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<BatchItem> {
    paths
        .iter()
        .map(|p| BatchItem::from_path(p.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    fn names(items: &[BatchItem]) -> Vec<&str> {
        items.iter().map(|i| i.display_name.as_str()).collect()
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_supported_extension(Path::new("a.JPG")));
        assert!(has_supported_extension(Path::new("a.Jpeg")));
        assert!(has_supported_extension(Path::new("a.gif")));
        assert!(!has_supported_extension(Path::new("a.tiff")));
        assert!(!has_supported_extension(Path::new("jpg")));
    }

    #[test]
    fn discovers_supported_files_sorted() {
        let tmp = TempDir::new().unwrap();
        for name in ["dusk.jpeg", "b.PNG", "a.jpg", "notes.txt", "scan.bmp", "loop.gif"] {
            touch(tmp.path(), name);
        }

        let items = discover_images(tmp.path()).unwrap();
        assert_eq!(
            names(&items),
            vec!["a.jpg", "b.PNG", "dusk.jpeg", "loop.gif", "scan.bmp"]
        );
        assert_eq!(items[0].source_path, tmp.path().join("a.jpg"));
    }

    #[test]
    fn skips_hidden_files_and_subdirectories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".thumb.jpg");
        touch(tmp.path(), "keep.png");
        fs::create_dir(tmp.path().join("archive.jpg")).unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        touch(&tmp.path().join("nested"), "old.jpg");

        let items = discover_images(tmp.path()).unwrap();
        assert_eq!(names(&items), vec!["keep.png"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_images(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = discover_images(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::Io(_))));
    }

    #[test]
    fn file_instead_of_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.jpg");
        let result = discover_images(&tmp.path().join("a.jpg"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn explicit_paths_keep_order_and_skip_filtering() {
        let items = items_from_paths(&["/x/z.jpg", "/x/a.tiff", "/y/m.png"]);
        assert_eq!(names(&items), vec!["z.jpg", "a.tiff", "m.png"]);
    }
}
