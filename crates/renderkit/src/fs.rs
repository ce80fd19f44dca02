//! Filesystem access for template includes
//!
//! The resolver only needs four read operations, so it goes through the
//! [`TemplateFs`] trait. [`StdFs`] reads the real filesystem and
//! [`MemoryFs`] serves a fixed set of files from memory.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read-only filesystem used while resolving includes
pub trait TemplateFs {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the entries directly inside `dir`, in listing order
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Whole content of a file
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Stable identity of a path, used to detect include cycles
    fn canonical(&self, path: &Path) -> PathBuf {
        normalize(path)
    }
}

/// The real filesystem
///
/// Directory listings are sorted by name so folder includes are
/// reproducible across platforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl TemplateFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn canonical(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
    }
}

/// In-memory filesystem
///
/// Directories exist implicitly as parents of added files, or explicitly
/// through [`MemoryFs::with_dir`].
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = normalize(path.as_ref());
        let mut parent = path.parent();
        while let Some(dir) = parent {
            self.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path, content.to_string());
        self
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.dirs.insert(normalize(path.as_ref()));
        self
    }
}

impl TemplateFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.files.contains_key(&path) || self.dirs.contains(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(&normalize(path))
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let dir = normalize(dir);
        if !self.dirs.contains(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            ));
        }

        let children = self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter(|p| p.parent() == Some(dir.as_path()))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());

        let mut names: Vec<String> = children.collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(&normalize(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
