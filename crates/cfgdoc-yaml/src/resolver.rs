//! Include path resolution
//!
//! An include fragment is joined onto the root of the document that contains
//! it. Whatever the included file includes in turn is resolved against that
//! file's own directory.

use std::path::{Path, PathBuf};

/// Root used when a document has no known location
pub const CURRENT_DIR: &str = ".";

/// Resolves include fragments against a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

/// Where an include fragment points, and the root for its own includes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInclude {
    pub path: PathBuf,
    pub root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolver rooted at the process's working directory
    pub fn current_dir() -> Self {
        Self::new(CURRENT_DIR)
    }

    /// Resolver rooted at the directory containing `path`
    pub fn for_file(path: &Path) -> Self {
        Self::new(parent_dir(path))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join an include fragment onto the root
    ///
    /// Absolute fragments replace the root entirely.
    pub fn resolve(&self, fragment: &str) -> ResolvedInclude {
        let path = self.root.join(fragment);
        let root = parent_dir(&path);
        ResolvedInclude { path, root }
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::current_dir()
    }
}

/// Directory containing `path`; `.` for bare file names
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from(CURRENT_DIR),
        None => path.to_path_buf(),
    }
}
