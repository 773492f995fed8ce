//! Module origin resolution for ImportScope.
//!
//! Maps a dotted import path (`package.sub`) to the filesystem location that
//! defines it, using a pure search-path lookup: no interpreter is invoked and
//! no package initializer is executed. Candidates are probed in the same
//! precedence order Python's own finder uses: regular package
//! (`name/__init__.py`), then module file (`name.py`), then namespace-package
//! directory (`name/`, no initializer required).
//!
//! Also hosts the project membership filter that decides whether a resolved
//! origin belongs to the analyzed project at all.

use std::path::{Path, PathBuf};

/// Errors that can occur during module resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Neither the dotted path nor its parent names a module under any
    /// search root.
    #[error("Module not found on the search path: {path}")]
    NotFound { path: String },
}

/// Result type alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// The filesystem location backing a resolved dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOrigin {
    /// Absolute path of the module file, or of the package directory for a
    /// namespace package.
    pub path: PathBuf,
    /// True if the dotted path resolved directly to a module; false if it
    /// named an attribute and `path` is the defining parent module.
    pub is_module: bool,
}

impl ModuleOrigin {
    /// Returns true for namespace-package origins, which have no source
    /// file to read.
    pub fn is_package_dir(&self) -> bool {
        self.path.is_dir()
    }
}

/// Resolves dotted paths against a list of search roots.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    roots: Vec<PathBuf>,
}

impl ModuleResolver {
    /// Create a resolver over the given search roots, probed in order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Resolve a dotted path to its origin.
    ///
    /// Tries the full path as a module first. If that fails, the last
    /// segment may be an attribute rather than a module, so the parent path
    /// is resolved instead and the origin is flagged `is_module = false`.
    pub fn resolve(&self, dotted: &str) -> ResolveResult<ModuleOrigin> {
        if let Some(path) = self.locate(dotted) {
            return Ok(ModuleOrigin {
                path,
                is_module: true,
            });
        }

        let parent = match dotted.rsplit_once('.') {
            Some((parent, _)) => parent,
            None => {
                return Err(ResolveError::NotFound {
                    path: dotted.to_string(),
                })
            }
        };

        match self.locate(parent) {
            Some(path) => Ok(ModuleOrigin {
                path,
                is_module: false,
            }),
            None => Err(ResolveError::NotFound {
                path: dotted.to_string(),
            }),
        }
    }

    /// Find the file or directory defining `dotted`, if any.
    fn locate(&self, dotted: &str) -> Option<PathBuf> {
        if dotted.is_empty() {
            return None;
        }

        let relative: PathBuf = dotted.split('.').collect();

        for root in &self.roots {
            let dir = root.join(&relative);

            let init = dir.join("__init__.py");
            if init.is_file() {
                return Some(init);
            }

            let file = dir.with_extension("py");
            if file.is_file() {
                return Some(file);
            }

            // namespace package: a bare directory is a valid origin
            if dir.is_dir() {
                return Some(dir);
            }
        }

        None
    }
}

/// Returns true if `origin` lies within `base`, or `base` lies within
/// `origin`.
///
/// The check is symmetric so that namespace packages whose origin directory
/// sits above the analyzed script still count as project-local. Callers are
/// expected to pass normalized absolute paths; no filesystem access happens
/// here.
pub fn is_project_local(base: &Path, origin: &Path) -> bool {
    origin.starts_with(base) || base.starts_with(origin)
}
