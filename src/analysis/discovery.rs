// Candidate file discovery under the base directory

use crate::error::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directories never worth descending into
const DEFAULT_EXCLUDES: &[&str] = &["__pycache__", ".git", "venv", ".venv", ".tox", ".eggs"];

/// Lists `.py` files below a base directory, package `__init__.py` files excluded
pub struct FileDiscovery {
    exclude: Vec<Pattern>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            exclude: Vec::new(),
        }
    }

    /// Compile glob exclude patterns, matched against paths relative to the base
    pub fn with_excludes<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self.exclude.push(Pattern::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// All candidate files, sorted so menu indices are stable between runs
    pub fn python_files(&self, base: &Path) -> Result<Vec<PathBuf>> {
        if !base.is_dir() {
            return Err(Error::PathNotFound(base.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(base)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !is_default_excluded(entry.file_name().to_str()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "py") {
                continue;
            }
            if path.to_string_lossy().ends_with("__init__.py") {
                continue;
            }
            if self.is_excluded(path, base) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        debug!(base = %base.display(), count = files.len(), "discovered python files");
        Ok(files)
    }

    fn is_excluded(&self, path: &Path, base: &Path) -> bool {
        let relative = path.strip_prefix(base).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn is_default_excluded(name: Option<&str>) -> bool {
    name.map_or(false, |n| DEFAULT_EXCLUDES.contains(&n))
}
