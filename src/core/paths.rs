//! Path utilities
//!
//! Inputs are resolved against ROOT; displayed paths always use '/' as separator.

use std::path::{Path, PathBuf};

use crate::core::file_reader::STDIN_PATH;

/// Default file name of the persisted sheet state
pub const SHEET_STATE_FILE: &str = "sheet_state.json";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Resolve a user-supplied path against ROOT, leaving `-` and absolute paths alone
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path == Path::new(STDIN_PATH) || path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Path to show in results: relative to ROOT when possible
pub fn display_path(root: &Path, resolved: &Path) -> String {
    make_relative(resolved, root)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| normalize_path(resolved))
}

/// Location of the sheet state file for a given root
pub fn default_state_path(root: &Path) -> PathBuf {
    root.join(SHEET_STATE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/b/c.txt")), "a/b/c.txt");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        let path = Path::new("/project/data/tasks.json");
        assert_eq!(make_relative(path, root), Some("data/tasks.json".to_string()));
        assert_eq!(make_relative(Path::new("/other/x"), root), None);
    }

    #[test]
    fn test_resolve_relative() {
        let root = Path::new("/project");
        assert_eq!(
            resolve(root, Path::new("parrafo.txt")),
            PathBuf::from("/project/parrafo.txt")
        );
    }

    #[test]
    fn test_resolve_keeps_stdin_and_absolute() {
        let root = Path::new("/project");
        assert_eq!(resolve(root, Path::new("-")), PathBuf::from("-"));
        assert_eq!(resolve(root, Path::new("/tmp/a.txt")), PathBuf::from("/tmp/a.txt"));
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/project");
        assert_eq!(display_path(root, Path::new("/project/a.txt")), "a.txt");
        assert_eq!(display_path(root, Path::new("/tmp/b.txt")), "/tmp/b.txt");
        assert_eq!(display_path(root, Path::new("-")), "-");
    }

    #[test]
    fn test_default_state_path() {
        assert_eq!(
            default_state_path(Path::new("/project")),
            PathBuf::from("/project/sheet_state.json")
        );
    }
}
