//! Source file enumeration with gitignore support.
//!
//! Uses the `ignore` crate to walk directories while respecting
//! .gitignore, .git/info/exclude, and global gitignore.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// File extension of the source language being scanned.
pub const SOURCE_EXTENSION: &str = "cs";

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            respect_gitignore: true,
        }
    }
}

impl WalkOptions {
    /// Create options that include hidden files.
    pub fn with_hidden() -> Self {
        Self {
            include_hidden: true,
            ..Default::default()
        }
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Enumerate the C# source files reachable from `root`.
///
/// If `root` is itself a regular file it is returned as a singleton list,
/// regardless of extension. For directories, the walk is best-effort:
/// unreadable subtrees are skipped silently rather than failing the whole
/// traversal. A nonexistent root is an error.
///
/// # Examples
///
/// ```no_run
/// use stubgen::walker::{source_files, WalkOptions};
/// use std::path::Path;
///
/// let paths = source_files(Path::new("./project"), &WalkOptions::default()).unwrap();
/// for path in paths {
///     println!("{}", path.display());
/// }
/// ```
pub fn source_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }

    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut builder = WalkBuilder::new(root);

    builder
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .follow_links(options.follow_symlinks);

    let mut paths = Vec::new();

    for entry in builder.build() {
        // Best-effort traversal: unreadable entries are skipped, not fatal
        let Ok(entry) = entry else { continue };

        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        if is_file && is_source_file(entry.path()) {
            paths.push(entry.path().to_path_buf());
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/Calculator.cs"), "namespace N {}").unwrap();
        fs::write(dir.path().join("src/Parser.cs"), "namespace N {}").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        dir
    }

    #[test]
    fn test_source_files_filters_extension() {
        let dir = create_test_dir();

        let paths = source_files(dir.path(), &WalkOptions::default()).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().any(|p| p.ends_with("Calculator.cs")));
        assert!(paths.iter().any(|p| p.ends_with("Parser.cs")));
        assert!(!paths.iter().any(|p| p.ends_with("README.md")));
    }

    #[test]
    fn test_source_files_nonexistent_root() {
        let result = source_files(Path::new("/nonexistent/path"), &WalkOptions::default());
        assert!(matches!(result, Err(WalkError::NotFound { .. })));
    }

    #[test]
    fn test_source_files_singleton_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "not c# at all").unwrap();

        // A file root is returned as-is, even without the .cs extension
        let paths = source_files(&file, &WalkOptions::default()).unwrap();
        assert_eq!(paths, vec![file]);
    }

    #[test]
    fn test_source_files_respects_gitignore() {
        let dir = TempDir::new().unwrap();

        // Initialize git repo (ignore crate needs this to respect .gitignore)
        fs::create_dir(dir.path().join(".git")).unwrap();

        fs::write(dir.path().join("Visible.cs"), "namespace A {}").unwrap();
        fs::write(dir.path().join("Generated.cs"), "namespace B {}").unwrap();
        fs::write(dir.path().join(".gitignore"), "Generated.cs").unwrap();

        let paths = source_files(dir.path(), &WalkOptions::default()).unwrap();

        assert!(paths.iter().any(|p| p.ends_with("Visible.cs")));
        assert!(!paths.iter().any(|p| p.ends_with("Generated.cs")));
    }

    #[test]
    fn test_source_files_hidden() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("Visible.cs"), "namespace A {}").unwrap();
        fs::write(dir.path().join(".Hidden.cs"), "namespace B {}").unwrap();

        // Default: exclude hidden
        let paths = source_files(dir.path(), &WalkOptions::default()).unwrap();
        assert!(!paths.iter().any(|p| p.ends_with(".Hidden.cs")));

        // With hidden
        let paths = source_files(dir.path(), &WalkOptions::with_hidden()).unwrap();
        assert!(paths.iter().any(|p| p.ends_with(".Hidden.cs")));
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Upper.CS"), "namespace A {}").unwrap();

        let paths = source_files(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(paths.len(), 1);
    }
}
