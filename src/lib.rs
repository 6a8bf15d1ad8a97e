//! uml-generator - UML class diagrams from Python source code
//!
//! Parses a main script with tree-sitter, follows the imports that belong to a
//! chosen sub-package, extracts top-level classes with their methods and
//! class-body attributes, and writes a draw.io XML diagram.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{
    extract_classes, Analyzer, ClassRecord, DiagramRequest, DiagramRun, FileDiscovery,
    ImportResolver, MemberEntry, Resolution, Visibility,
};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{output_file_name, DiagramNode, DrawioWriter, Layout};
pub use parser::{ImportReference, PythonParser, SourceUnit, Statement};
