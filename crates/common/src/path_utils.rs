//! Path normalization utilities for object-key derivation.

use std::path::{Component, Path, PathBuf};

use crate::error::PathError;

/// Convert a path to absolute without resolving symlinks.
///
/// # Arguments
/// * `path` - Path to convert (relative or absolute)
///
/// # Returns
/// Absolute path, joining with current directory if relative.
///
/// # Errors
/// Returns error if current directory cannot be determined.
pub fn to_absolute(path: &Path) -> Result<PathBuf, PathError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        std::env::current_dir()
            .map(|cwd: PathBuf| cwd.join(path))
            .map_err(|e: std::io::Error| PathError::IoError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

/// Lexical path normalization without filesystem access.
///
/// Removes `.` components and resolves `..` components lexically.
/// Does not access the filesystem or resolve symlinks.
///
/// # Arguments
/// * `path` - Path to normalize
///
/// # Returns
/// Normalized path with `.` and `..` resolved lexically.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => { /* skip . */ }
            Component::ParentDir => {
                // Pop if we can and it's not a ParentDir or RootDir
                if !components.is_empty()
                    && !matches!(
                        components.last(),
                        Some(Component::ParentDir) | Some(Component::RootDir)
                    )
                {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Convert a path to POSIX-style string (forward slashes).
///
/// Object keys are always POSIX format regardless of the host OS.
///
/// # Arguments
/// * `path` - Path to convert
///
/// # Returns
/// String with forward slashes as separators.
pub fn to_posix_path(path: &Path) -> String {
    path.components()
        .map(|c: Component| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Derive the root-relative portion of an object key for a local file.
///
/// This function:
/// 1. Converts both paths to absolute WITHOUT resolving symlinks
/// 2. Removes `.` and `..` components via lexical normalization
/// 3. Converts to POSIX format (forward slashes)
/// 4. Returns the path relative to `root` with no leading separator
///
/// # Arguments
/// * `path` - Local file path
/// * `root` - Sync root directory
///
/// # Returns
/// POSIX-style relative path suitable for use as a key suffix.
///
/// # Errors
/// Returns error if path is outside the root directory.
pub fn relative_key(path: &Path, root: &Path) -> Result<String, PathError> {
    let abs_path: PathBuf = to_absolute(path)?;
    let normalized: PathBuf = lexical_normalize(&abs_path);

    let abs_root: PathBuf = to_absolute(root)?;
    let normalized_root: PathBuf = lexical_normalize(&abs_root);

    let relative: &Path = normalized
        .strip_prefix(&normalized_root)
        .map_err(|_| PathError::PathOutsideRoot {
            path: normalized.display().to_string(),
            root: normalized_root.display().to_string(),
        })?;

    Ok(to_posix_path(relative)
        .trim_start_matches('/')
        .to_string())
}

/// Normalize a key prefix for bucket operations.
///
/// An empty prefix stays empty; a non-empty prefix gets exactly one
/// trailing `/`, so `"mobile"`, `"mobile/"`, and `"mobile//"` all become
/// `"mobile/"`.
///
/// # Arguments
/// * `prefix` - Raw prefix string
///
/// # Returns
/// Normalized prefix.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed: &str = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}
