// Import resolution for Python modules
//
// Maps dotted import paths onto files under the base directory. Only imports
// whose dotted path contains the sub-package token are followed; the token is
// a plain substring match, so it has to be specific enough to avoid catching
// unrelated packages.

use crate::error::Error;
use crate::parser::ImportReference;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of resolving one import reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Not part of the sub-package, or nothing left after dropping the symbol
    Skipped,
    /// Existing source file
    Found(PathBuf),
    /// Computed path does not exist
    Missing(PathBuf),
}

/// Files found for a batch of imports, plus the paths that were missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImports {
    /// Existing files, one per matching reference, in import order
    pub files: Vec<PathBuf>,
    /// Computed paths that did not exist
    pub missing: Vec<PathBuf>,
}

/// Resolves imports of one sub-package to source files
pub struct ImportResolver {
    base_directory: PathBuf,
    sub_package: String,
}

impl ImportResolver {
    /// Create a resolver rooted at `base_directory`, following only imports
    /// that mention `sub_package`
    pub fn new(base_directory: impl Into<PathBuf>, sub_package: impl Into<String>) -> Self {
        Self {
            base_directory: base_directory.into(),
            sub_package: sub_package.into(),
        }
    }

    /// Whether an import belongs to the sub-package
    pub fn matches(&self, import: &ImportReference) -> bool {
        import.path().contains(self.sub_package.as_str())
    }

    /// Path the import maps to under the base directory, before it is made absolute
    ///
    /// The last dotted segment is the imported symbol, not a module:
    /// `pkg.sub.module.ClassName` maps to `<base>/pkg/sub/module.py`.
    pub fn candidate_path(&self, import: &ImportReference) -> Option<PathBuf> {
        if !self.matches(import) {
            return None;
        }
        let module = import.parent_module().filter(|m| !m.is_empty())?;

        let mut path = self.base_directory.clone();
        let mut segments = module.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{}.py", segment));
            }
        }
        Some(path)
    }

    /// Resolve a single import against the file system
    pub fn resolve(&self, import: &ImportReference) -> Resolution {
        if !self.matches(import) {
            return Resolution::Skipped;
        }
        let Some(candidate) = self.candidate_path(import) else {
            debug!(import = %import, "no module part to resolve");
            return Resolution::Skipped;
        };

        let path = absolute(&candidate);
        if path.exists() {
            Resolution::Found(path)
        } else {
            Resolution::Missing(path)
        }
    }

    /// Resolve all imports, logging the ones whose file is missing
    ///
    /// A module imported by several references is listed once per reference.
    pub fn resolve_all(&self, imports: &[ImportReference]) -> ResolvedImports {
        let mut resolved = ResolvedImports::default();

        for import in imports {
            match self.resolve(import) {
                Resolution::Found(path) => {
                    debug!(import = %import, path = %path.display(), "resolved import");
                    resolved.files.push(path);
                }
                Resolution::Missing(path) => {
                    warn!("{}", Error::ImportNotFound(path.clone()));
                    resolved.missing.push(path);
                }
                Resolution::Skipped => {}
            }
        }

        resolved
    }
}

/// Make a path absolute against the current directory and fold `.`/`..`
/// lexically, without touching symlinks
pub fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
