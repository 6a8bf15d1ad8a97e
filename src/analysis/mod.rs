// Analysis module: from a main script to the classes worth drawing

pub mod classes;
pub mod discovery;
pub mod imports;

pub use classes::*;
pub use discovery::*;
pub use imports::*;

use crate::error::Result;
use crate::parser::{PythonParser, SourceUnit};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Inputs for one diagram run
#[derive(Debug, Clone)]
pub struct DiagramRequest {
    /// Script whose imports decide which files are included
    pub main_script: PathBuf,
    /// Root that dotted import paths are resolved against
    pub base_directory: PathBuf,
    /// Substring an import must contain to be followed
    pub sub_package: String,
}

impl DiagramRequest {
    pub fn new(
        main_script: impl Into<PathBuf>,
        base_directory: impl Into<PathBuf>,
        sub_package: impl Into<String>,
    ) -> Self {
        Self {
            main_script: main_script.into(),
            base_directory: base_directory.into(),
            sub_package: sub_package.into(),
        }
    }
}

/// Result of a diagram run
#[derive(Debug, Default)]
pub struct DiagramRun {
    /// Files that were analyzed, in output order (main script last)
    pub files: Vec<PathBuf>,
    /// Extracted classes, concatenated in file order
    pub classes: Vec<ClassRecord>,
    /// Files that failed to read or parse, with the error message
    pub parse_errors: Vec<(PathBuf, String)>,
    /// Import paths that did not exist on disk
    pub missing_imports: Vec<PathBuf>,
}

/// Per-file outcome, before concatenation
struct FileOutcome {
    path: PathBuf,
    classes: Vec<ClassRecord>,
    error: Option<String>,
}

/// Runs the parse, resolve, extract pipeline
pub struct Analyzer {
    parser: PythonParser,
}

impl Analyzer {
    /// Create a new analyzer
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Analyze the main script and the sub-package files it imports
    ///
    /// Per-file failures are recorded in the returned run, never propagated.
    pub fn analyze(&mut self, request: &DiagramRequest) -> Result<DiagramRun> {
        let mut run = DiagramRun::default();

        // Step 1: Parse the main script
        let (main_unit, main_error) = parse_lenient(&mut self.parser, &request.main_script);
        if let Some(err) = main_error {
            run.parse_errors.push((request.main_script.clone(), err));
        }

        // Step 2: Resolve its imports
        let imports = main_unit.imports();
        debug!(count = imports.len(), "collected imports from main script");
        let resolver = ImportResolver::new(&request.base_directory, request.sub_package.as_str());
        let resolved = resolver.resolve_all(&imports);
        run.missing_imports = resolved.missing;

        // Step 3: Extract classes from imported files; collect keeps input order.
        // A file imported by several references is extracted once per reference.
        let outcomes: Vec<FileOutcome> = resolved
            .files
            .par_iter()
            .map_init(PythonParser::new, |parser, path| match parser {
                Ok(parser) => extract_file(parser, path),
                Err(e) => FileOutcome {
                    path: path.clone(),
                    classes: Vec::new(),
                    error: Some(e.to_string()),
                },
            })
            .collect();

        for outcome in outcomes {
            if let Some(err) = outcome.error {
                run.parse_errors.push((outcome.path.clone(), err));
            }
            run.classes.extend(outcome.classes);
            run.files.push(outcome.path);
        }

        // Step 4: Main script classes go last
        run.classes.extend(extract_classes(&main_unit));
        run.files.push(request.main_script.clone());

        info!(
            files = run.files.len(),
            classes = run.classes.len(),
            parse_errors = run.parse_errors.len(),
            missing_imports = run.missing_imports.len(),
            "analysis complete"
        );
        Ok(run)
    }
}

/// Parse a file, substituting an empty unit on failure
fn parse_lenient(parser: &mut PythonParser, path: &Path) -> (SourceUnit, Option<String>) {
    match parser.parse_file(path) {
        Ok(unit) => (unit, None),
        Err(e) => {
            warn!("{}", e);
            (SourceUnit::empty(path), Some(e.to_string()))
        }
    }
}

fn extract_file(parser: &mut PythonParser, path: &Path) -> FileOutcome {
    let (unit, error) = parse_lenient(parser, path);
    let classes = extract_classes(&unit);
    debug!(path = %path.display(), classes = classes.len(), "extracted classes");
    FileOutcome {
        path: path.to_path_buf(),
        classes,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(run: &DiagramRun) -> Vec<&str> {
        run.classes.iter().map(|c| c.name.as_str()).collect()
    }

    fn create_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let models = dir.path().join("src/shop/models");
        fs::create_dir_all(&models).unwrap();

        fs::write(models.join("user.py"), "class User:\n    name: str\n").unwrap();
        fs::write(
            models.join("order.py"),
            "class Order:\n    def total(self): pass\n\nclass OrderLine:\n    pass\n",
        )
        .unwrap();
        fs::write(models.join("broken.py"), "class Broken(:\n    pass\n").unwrap();
        fs::write(
            dir.path().join("src/shop/main.py"),
            "\
from shop.models.broken import Broken
from shop.models.order import Order, OrderLine
from shop.models.user import User
from shop.models.ghost import Ghost
import os

class App:
    def run(self): pass
",
        )
        .unwrap();
        dir
    }

    fn request(dir: &TempDir) -> DiagramRequest {
        DiagramRequest::new(
            dir.path().join("src/shop/main.py"),
            dir.path().join("src"),
            "models",
        )
    }

    #[test]
    fn test_imported_classes_first_main_last() {
        let dir = create_project();
        let mut analyzer = Analyzer::new().unwrap();
        let run = analyzer.analyze(&request(&dir)).unwrap();

        // order.py is listed once for Order and once for OrderLine
        assert_eq!(
            names(&run),
            vec!["Order", "OrderLine", "Order", "OrderLine", "User", "App"]
        );
        assert_eq!(run.files.last(), Some(&dir.path().join("src/shop/main.py")));
    }

    #[test]
    fn test_broken_file_is_skipped_and_reported() {
        let dir = create_project();
        let mut analyzer = Analyzer::new().unwrap();
        let run = analyzer.analyze(&request(&dir)).unwrap();

        assert_eq!(run.parse_errors.len(), 1);
        let (path, message) = &run.parse_errors[0];
        assert!(path.ends_with("broken.py"));
        assert!(message.contains("broken.py"));
    }

    #[test]
    fn test_missing_import_is_recorded() {
        let dir = create_project();
        let mut analyzer = Analyzer::new().unwrap();
        let run = analyzer.analyze(&request(&dir)).unwrap();

        assert_eq!(run.missing_imports, vec![dir.path().join("src/shop/models/ghost.py")]);
    }

    #[test]
    fn test_unreadable_main_script_yields_no_classes() {
        let dir = TempDir::new().unwrap();
        let mut analyzer = Analyzer::new().unwrap();
        let run = analyzer
            .analyze(&DiagramRequest::new(dir.path().join("absent.py"), dir.path(), "models"))
            .unwrap();

        assert!(run.classes.is_empty());
        assert_eq!(run.parse_errors.len(), 1);
    }

    #[test]
    fn test_self_import_repeats_main_classes() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("src/app/models");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("core.py"),
            "from app.models.core import Thing\n\nclass Thing:\n    pass\n",
        )
        .unwrap();

        let mut analyzer = Analyzer::new().unwrap();
        let run = analyzer
            .analyze(&DiagramRequest::new(pkg.join("core.py"), dir.path().join("src"), "models"))
            .unwrap();
        assert_eq!(names(&run), vec!["Thing", "Thing"]);
        assert_eq!(run.files, vec![absolute(&pkg.join("core.py")), pkg.join("core.py")]);
    }
}
