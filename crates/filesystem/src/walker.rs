//! Recursive directory walker for sync operations.

use std::path::{Path, PathBuf};

use site_sync_common::relative_key;
use walkdir::WalkDir;

use crate::error::FileSystemError;

/// A regular file discovered under the sync root.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Path relative to the root, POSIX format, no leading separator.
    pub relative_path: String,
}

/// Enumerate all regular files under `root`.
///
/// Recurses into subdirectories to arbitrary depth without following
/// symlinks, so the walk never escapes the root. Directories themselves are
/// not returned. Traversal order is unspecified; callers must not rely on
/// it.
///
/// This is an all-or-nothing step: a missing root or any unreadable
/// directory fails the whole walk with no partial results, before any
/// upload is attempted.
///
/// # Arguments
/// * `root` - Directory to enumerate
///
/// # Returns
/// All regular files under the root with their relative key material.
///
/// # Errors
/// Returns `FileSystemError::RootNotFound` if `root` is not a directory,
/// `FileSystemError::IoError` if any entry cannot be read.
pub fn walk(root: &Path) -> Result<Vec<WalkedFile>, FileSystemError> {
    if !root.is_dir() {
        return Err(FileSystemError::RootNotFound {
            path: root.display().to_string(),
        });
    }

    let mut files: Vec<WalkedFile> = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).into_iter() {
        let entry: walkdir::DirEntry = entry.map_err(|e| {
            let path: String = e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            FileSystemError::IoError {
                path,
                source: e.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path: &Path = entry.path();
        let relative_path: String = relative_key(path, root)?;

        files.push(WalkedFile {
            path: path.to_path_buf(),
            relative_path,
        });
    }

    log::debug!("Walked {}: {} files", root.display(), files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// Create a file with parent directories as needed.
    fn write_file(root: &Path, relative: &str) {
        let path: PathBuf = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"content").unwrap();
    }

    fn relative_set(files: &[WalkedFile]) -> HashSet<String> {
        files.iter().map(|f| f.relative_path.clone()).collect()
    }

    #[test]
    fn test_walk_flat_directory() {
        let dir: TempDir = TempDir::new().unwrap();
        write_file(dir.path(), "index.html");
        write_file(dir.path(), "app.js");

        let files: Vec<WalkedFile> = walk(dir.path()).unwrap();
        assert_eq!(
            relative_set(&files),
            HashSet::from(["index.html".to_string(), "app.js".to_string()])
        );
    }

    #[test]
    fn test_walk_nested_directories() {
        let dir: TempDir = TempDir::new().unwrap();
        write_file(dir.path(), "index.html");
        write_file(dir.path(), "assets/css/main.css");
        write_file(dir.path(), "assets/js/vendor/lib.js");
        write_file(dir.path(), "deep/a/b/c/d/e/file.txt");

        let files: Vec<WalkedFile> = walk(dir.path()).unwrap();
        assert_eq!(
            relative_set(&files),
            HashSet::from([
                "index.html".to_string(),
                "assets/css/main.css".to_string(),
                "assets/js/vendor/lib.js".to_string(),
                "deep/a/b/c/d/e/file.txt".to_string(),
            ])
        );
    }

    #[test]
    fn test_walk_excludes_directories() {
        let dir: TempDir = TempDir::new().unwrap();
        write_file(dir.path(), "sub/file.txt");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let files: Vec<WalkedFile> = walk(dir.path()).unwrap();
        assert_eq!(relative_set(&files), HashSet::from(["sub/file.txt".to_string()]));
    }

    #[test]
    fn test_walk_empty_root() {
        let dir: TempDir = TempDir::new().unwrap();
        let files: Vec<WalkedFile> = walk(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_walk_missing_root() {
        let dir: TempDir = TempDir::new().unwrap();
        let missing: PathBuf = dir.path().join("does-not-exist");
        let result: Result<Vec<WalkedFile>, FileSystemError> = walk(&missing);
        assert!(matches!(result, Err(FileSystemError::RootNotFound { .. })));
    }

    #[test]
    fn test_walk_root_is_file() {
        let dir: TempDir = TempDir::new().unwrap();
        write_file(dir.path(), "not-a-dir");
        let result: Result<Vec<WalkedFile>, FileSystemError> =
            walk(&dir.path().join("not-a-dir"));
        assert!(matches!(result, Err(FileSystemError::RootNotFound { .. })));
    }

    #[test]
    fn test_walked_file_keeps_absolute_path() {
        let dir: TempDir = TempDir::new().unwrap();
        write_file(dir.path(), "sub/app.js");

        let files: Vec<WalkedFile> = walk(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.is_absolute());
        assert!(files[0].path.ends_with("sub/app.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_unreadable_subdirectory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir: TempDir = TempDir::new().unwrap();
        write_file(dir.path(), "ok.txt");
        let locked: PathBuf = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        write_file(dir.path(), "locked/secret.txt");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users bypass directory permissions, nothing to test
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result: Result<Vec<WalkedFile>, FileSystemError> = walk(dir.path());

        // Restore permissions so TempDir can clean up
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(FileSystemError::IoError { .. })));
    }
}
