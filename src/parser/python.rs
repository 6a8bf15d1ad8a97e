// Python parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::*;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};
use tracing::debug;

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a Python file
    pub fn parse_file(&mut self, path: &Path) -> Result<SourceUnit> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::parse(path, e.to_string()))?;
        self.parse_source(&source, path.to_path_buf())
    }

    /// Parse Python source code
    ///
    /// Any syntax error fails the whole file: a partially recovered tree would
    /// put half-parsed classes on the diagram.
    pub fn parse_source(&mut self, source: &str, path: PathBuf) -> Result<SourceUnit> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(&path, "parser returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let node = first_error(&root).unwrap_or(root);
            let pos = node.start_position();
            return Err(Error::parse(
                &path,
                format!("invalid syntax at line {}, column {}", pos.row + 1, pos.column + 1),
            ));
        }

        let body = lower_block(&root, source.as_bytes());
        debug!(path = %path.display(), statements = body.len(), "parsed source");
        Ok(SourceUnit::new(path, body))
    }
}

/// Locate the first ERROR or MISSING node in document order
fn first_error<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(&child) {
                return Some(found);
            }
        }
    }
    None
}

/// Lower every statement directly inside a module or block node
fn lower_block(node: &Node, source: &[u8]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(statement) = lower_statement(&child, source) {
            statements.push(statement);
        }
    }
    statements
}

fn lower_statement(node: &Node, source: &[u8]) -> Option<Statement> {
    match node.kind() {
        "comment" => None,
        "import_statement" => Some(lower_import(node, source)),
        "import_from_statement" | "future_import_statement" => {
            Some(lower_import_from(node, source))
        }
        "class_definition" => {
            let name = field_text(node, "name", source)?;
            Some(Statement::ClassDef {
                name,
                body: field_block(node, source),
            })
        }
        "function_definition" => {
            let name = field_text(node, "name", source)?;
            let body = field_block(node, source);
            if is_async(node) {
                Some(Statement::AsyncFunctionDef { name, body })
            } else {
                Some(Statement::FunctionDef { name, body })
            }
        }
        "if_statement" => Some(Statement::Other {
            body: if_branches(node, source),
        }),
        "try_statement" => Some(Statement::Other {
            body: try_branches(node, source),
        }),
        "decorated_definition" => {
            let definition = node.child_by_field_name("definition")?;
            lower_statement(&definition, source)
        }
        "expression_statement" => {
            let mut cursor = node.walk();
            let assignment = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "assignment");
            match assignment {
                Some(assignment) => Some(lower_assignment(&assignment, source)),
                None => Some(Statement::Other { body: Vec::new() }),
            }
        }
        _ => Some(Statement::Other {
            body: nested_statements(node, source),
        }),
    }
}

/// `import a.b, c as d`
fn lower_import(node: &Node, source: &[u8]) -> Statement {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let name = match child.kind() {
            "dotted_name" => text(&child, source),
            "aliased_import" => field_text(&child, "name", source),
            _ => None,
        };
        names.extend(name);
    }
    Statement::Import { names }
}

/// `from a.b import c, d as e`, `from . import x`, `from a import *`
fn lower_import_from(node: &Node, source: &[u8]) -> Statement {
    let mut module = None;
    let mut names = Vec::new();
    let mut seen_import_keyword = false;

    if node.kind() == "future_import_statement" {
        module = Some("__future__".to_string());
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import" => seen_import_keyword = true,
            "dotted_name" if !seen_import_keyword => module = text(&child, source),
            "relative_import" => {
                // The leading dots are dropped; only the named part remains
                let mut inner = child.walk();
                module = child
                    .named_children(&mut inner)
                    .find(|c| c.kind() == "dotted_name")
                    .and_then(|c| text(&c, source));
            }
            "dotted_name" => names.extend(text(&child, source)),
            "aliased_import" => names.extend(field_text(&child, "name", source)),
            "wildcard_import" => names.push("*".to_string()),
            _ => {}
        }
    }

    Statement::ImportFrom { module, names }
}

/// Plain, chained, or annotated assignment
fn lower_assignment(node: &Node, source: &[u8]) -> Statement {
    if node.child_by_field_name("type").is_some() {
        let target = node
            .child_by_field_name("left")
            .map(|left| target(&left, source))
            .unwrap_or(Target::Complex);
        return Statement::AnnAssign { target };
    }

    // `a = b = 1` nests the second assignment in the right-hand side
    let mut targets = Vec::new();
    let mut current = Some(*node);
    while let Some(assignment) = current {
        if let Some(left) = assignment.child_by_field_name("left") {
            targets.push(target(&left, source));
        }
        current = assignment
            .child_by_field_name("right")
            .filter(|right| right.kind() == "assignment" && right.child_by_field_name("type").is_none());
    }
    Statement::Assign { targets }
}

fn target(node: &Node, source: &[u8]) -> Target {
    match node.kind() {
        "identifier" => text(node, source).map(Target::Name).unwrap_or(Target::Complex),
        _ => Target::Complex,
    }
}

fn is_async(node: &Node) -> bool {
    node.child(0).is_some_and(|first| first.kind() == "async")
}

/// `if` body, then each `elif` one level deeper than the branch before it.
/// A trailing `else` sits at the depth of the last branch.
fn if_branches(node: &Node, source: &[u8]) -> Vec<Statement> {
    let mut consequence = Vec::new();
    let mut elifs = Vec::new();
    let mut alternative = Vec::new();

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block" => consequence = lower_block(&child, source),
            "elif_clause" => elifs.push(nested_statements(&child, source)),
            "else_clause" => alternative = nested_statements(&child, source),
            _ => {}
        }
    }

    let mut tail = alternative;
    for mut body in elifs.into_iter().rev() {
        body.append(&mut tail);
        tail = vec![Statement::Other { body }];
    }
    consequence.extend(tail);
    consequence
}

/// `try` body, `else` and `finally` at one level; each handler body one deeper
fn try_branches(node: &Node, source: &[u8]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block" => statements.extend(lower_block(&child, source)),
            "except_clause" | "except_group_clause" => statements.push(Statement::Other {
                body: nested_statements(&child, source),
            }),
            _ => statements.extend(nested_statements(&child, source)),
        }
    }
    statements
}

/// Statements inside any blocks below a compound statement
/// (`else`/`finally` clauses, `for`, `while`, `with`, `match`)
fn nested_statements(node: &Node, source: &[u8]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "block" {
            statements.extend(lower_block(&child, source));
        } else {
            statements.extend(nested_statements(&child, source));
        }
    }
    statements
}

fn field_block(node: &Node, source: &[u8]) -> Vec<Statement> {
    node.child_by_field_name("body")
        .map(|body| lower_block(&body, source))
        .unwrap_or_default()
}

fn field_text(node: &Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| text(&child, source))
}

fn text(node: &Node, source: &[u8]) -> Option<String> {
    node.utf8_text(source).ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceUnit {
        let mut parser = PythonParser::new().unwrap();
        parser.parse_source(source, PathBuf::from("test.py")).unwrap()
    }

    fn import_paths(source: &str) -> Vec<String> {
        parse(source).imports().iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_parser_new() {
        assert!(PythonParser::new().is_ok());
    }

    #[test]
    fn test_empty_file() {
        let unit = parse("");
        assert!(unit.is_empty());
    }

    #[test]
    fn test_simple_import() {
        assert_eq!(import_paths("import os"), vec!["os"]);
    }

    #[test]
    fn test_import_uses_original_name_not_alias() {
        assert_eq!(import_paths("import numpy as np, os.path"), vec!["numpy", "os.path"]);
    }

    #[test]
    fn test_from_import_expands_names() {
        assert_eq!(
            import_paths("from pkg.sub.module import ClassName, helper as h"),
            vec!["pkg.sub.module.ClassName", "pkg.sub.module.helper"]
        );
    }

    #[test]
    fn test_parenthesized_from_import() {
        assert_eq!(
            import_paths("from a.b import (\n    C,\n    D,\n)\n"),
            vec!["a.b.C", "a.b.D"]
        );
    }

    #[test]
    fn test_wildcard_import() {
        assert_eq!(import_paths("from pkg.models import *"), vec!["pkg.models.*"]);
    }

    #[test]
    fn test_relative_imports_drop_dots() {
        assert_eq!(import_paths("from .models import User"), vec!["models.User"]);
        assert_eq!(import_paths("from . import views"), vec!["views"]);
    }

    #[test]
    fn test_future_import() {
        assert_eq!(
            import_paths("from __future__ import annotations"),
            vec!["__future__.annotations"]
        );
    }

    #[test]
    fn test_nested_imports_come_after_top_level() {
        let source = "\
def load():
    import late

try:
    import fast
except ImportError:
    import slow

import json
";
        assert_eq!(import_paths(source), vec!["json", "late", "fast", "slow"]);
    }

    #[test]
    fn test_branch_imports_follow_statement_depth() {
        // elif and except bodies sit one level below their if/try
        let source = "\
if a:
    import x.first
elif b:
    import x.second
elif c:
    import x.third
else:
    import x.other
import x.top
try:
    import x.body
except E:
    import x.handler
else:
    import x.fallback
finally:
    import x.final
";
        assert_eq!(
            import_paths(source),
            vec![
                "x.top", "x.first", "x.body", "x.fallback", "x.final", "x.second",
                "x.handler", "x.third", "x.other",
            ]
        );
    }

    #[test]
    fn test_plain_else_stays_at_if_depth() {
        let source = "if a:\n    import x.one\nelse:\n    import x.two\nimport x.top\n";
        assert_eq!(import_paths(source), vec!["x.top", "x.one", "x.two"]);
    }

    #[test]
    fn test_class_lowering() {
        let unit = parse("class Account:\n    rate = 1\n    def deposit(self): pass\n");
        assert_eq!(unit.body.len(), 1);
        match &unit.body[0] {
            Statement::ClassDef { name, body } => {
                assert_eq!(name, "Account");
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Statement::Assign { .. }));
                assert!(matches!(&body[1], Statement::FunctionDef { name, .. } if name == "deposit"));
            }
            other => panic!("Expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_decorated_definitions_unwrap() {
        let unit = parse("@dataclass\nclass Point:\n    @property\n    def x(self): pass\n");
        match &unit.body[0] {
            Statement::ClassDef { name, body } => {
                assert_eq!(name, "Point");
                assert!(matches!(&body[0], Statement::FunctionDef { name, .. } if name == "x"));
            }
            other => panic!("Expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_async_function_has_own_kind() {
        let unit = parse("async def fetch(url):\n    import aiohttp\n");
        assert!(
            matches!(&unit.body[0], Statement::AsyncFunctionDef { name, .. } if name == "fetch")
        );
        assert_eq!(unit.imports()[0].to_string(), "aiohttp");

        let unit = parse("@cached\nasync def load(): pass\n");
        assert!(matches!(&unit.body[0], Statement::AsyncFunctionDef { .. }));
    }

    #[test]
    fn test_chained_assignment_targets() {
        let unit = parse("a = b = 1");
        assert_eq!(
            unit.body[0],
            Statement::Assign {
                targets: vec![Target::Name("a".to_string()), Target::Name("b".to_string())]
            }
        );
    }

    #[test]
    fn test_tuple_and_attribute_targets_are_complex() {
        let unit = parse("a, b = 1, 2\nself.x = 3\n");
        assert_eq!(unit.body[0], Statement::Assign { targets: vec![Target::Complex] });
        assert_eq!(unit.body[1], Statement::Assign { targets: vec![Target::Complex] });
    }

    #[test]
    fn test_annotated_assignment() {
        let unit = parse("_x: int = 1\ny: str\n");
        assert_eq!(
            unit.body[0],
            Statement::AnnAssign { target: Target::Name("_x".to_string()) }
        );
        assert_eq!(
            unit.body[1],
            Statement::AnnAssign { target: Target::Name("y".to_string()) }
        );
    }

    #[test]
    fn test_augmented_assignment_is_other() {
        let unit = parse("count += 1");
        assert!(matches!(unit.body[0], Statement::Other { .. }));
    }

    #[test]
    fn test_syntax_error_is_reported_with_location() {
        let mut parser = PythonParser::new().unwrap();
        let err = parser
            .parse_source("class Broken(:\n    pass\n", PathBuf::from("broken.py"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.py"));
        assert!(message.contains("invalid syntax at line 1"));
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let mut parser = PythonParser::new().unwrap();
        let err = parser.parse_file(Path::new("/nonexistent/missing.py")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("/nonexistent/missing.py"));
    }
}
