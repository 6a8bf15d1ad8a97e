// Syntax tree types for parsed Python code
//
// The tree-sitter concrete tree is lowered into this small statement tree. Only
// the statement kinds the class extractor and import walker care about get
// their own variant; everything else is `Other`, which keeps nested blocks so
// imports inside `if`/`try`/`with` bodies are still reachable.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

/// A parsed Python file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path the source was read from
    pub path: PathBuf,
    /// Top-level statements in source order
    pub body: Vec<Statement>,
}

impl SourceUnit {
    pub fn new(path: PathBuf, body: Vec<Statement>) -> Self {
        Self { path, body }
    }

    /// Stand-in for a file that could not be read or parsed
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            body: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterate over every statement in the tree, breadth-first
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            queue: self.body.iter().collect(),
        }
    }

    /// All import references in the file, in walk order
    ///
    /// `from m import a, b` yields `m.a` and `m.b`, so both import forms share
    /// one dotted-path shape.
    pub fn imports(&self) -> Vec<ImportReference> {
        let mut imports = Vec::new();
        for statement in self.walk() {
            match statement {
                Statement::Import { names } => {
                    imports.extend(names.iter().map(|n| ImportReference::direct(n)));
                }
                Statement::ImportFrom { module, names } => {
                    imports.extend(
                        names
                            .iter()
                            .map(|n| ImportReference::from_member(module.as_deref(), n)),
                    );
                }
                _ => {}
            }
        }
        imports
    }
}

/// Breadth-first statement iterator
pub struct Walk<'a> {
    queue: VecDeque<&'a Statement>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Statement;

    fn next(&mut self) -> Option<Self::Item> {
        let statement = self.queue.pop_front()?;
        self.queue.extend(statement.body());
        Some(statement)
    }
}

/// A statement, tagged by the kinds that matter for class diagrams
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `import a.b` or `import a.b as c` (original names only)
    Import { names: Vec<String> },
    /// `from a.b import c`; `module` is `None` for `from . import c`
    ImportFrom {
        module: Option<String>,
        names: Vec<String>,
    },
    /// `class Name: ...`, decorators stripped
    ClassDef { name: String, body: Vec<Statement> },
    /// `def name(...)`, decorators stripped
    FunctionDef { name: String, body: Vec<Statement> },
    /// `async def name(...)`; walked for imports but never drawn as a method
    AsyncFunctionDef { name: String, body: Vec<Statement> },
    /// `a = b = value`
    Assign { targets: Vec<Target> },
    /// `a: T = value` or `a: T`
    AnnAssign { target: Target },
    /// Anything else, with whatever statements it nests
    Other { body: Vec<Statement> },
}

impl Statement {
    /// Statements nested directly inside this one
    pub fn body(&self) -> &[Statement] {
        match self {
            Statement::ClassDef { body, .. }
            | Statement::FunctionDef { body, .. }
            | Statement::AsyncFunctionDef { body, .. }
            | Statement::Other { body } => body,
            _ => &[],
        }
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A bare identifier
    Name(String),
    /// Attribute, subscript, tuple or other pattern
    Complex,
}

impl Target {
    pub fn name(&self) -> Option<&str> {
        match self {
            Target::Name(name) => Some(name),
            Target::Complex => None,
        }
    }
}

/// A dotted import path discovered in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportReference {
    path: String,
}

impl ImportReference {
    /// Reference for `import module`
    pub fn direct(module: &str) -> Self {
        Self {
            path: module.to_string(),
        }
    }

    /// Reference for `from module import member`
    ///
    /// With no module name (`from . import member`) the member stands alone.
    pub fn from_member(module: Option<&str>, member: &str) -> Self {
        let path = match module {
            Some(module) if !module.is_empty() => format!("{}.{}", module, member),
            _ => member.to_string(),
        };
        Self { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Module part of the path: everything before the last dotted segment
    pub fn parent_module(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(module, _)| module)
    }
}

impl fmt::Display for ImportReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
