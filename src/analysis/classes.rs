// Class extraction for UML diagrams
//
// Reduces each top-level class into its name plus the methods and class-body
// attributes it declares, tagged with a visibility derived from the
// leading-underscore convention.

use crate::parser::{SourceUnit, Statement};
use std::fmt;

/// UML visibility of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `+`
    Public,
    /// `#`
    Protected,
    /// `-`
    Private,
}

impl Visibility {
    /// Visibility of a method name.
    ///
    /// Dunder methods (`__init__`) are public; name-mangled ones (`__x`) private.
    pub fn of_method(name: &str) -> Self {
        if name.starts_with("__") && name.ends_with("__") {
            Visibility::Public
        } else {
            Self::of_attribute(name)
        }
    }

    /// Visibility of an attribute name. No dunder exception: `__slots__` is private.
    pub fn of_attribute(name: &str) -> Self {
        if name.starts_with("__") {
            Visibility::Private
        } else if name.starts_with('_') {
            Visibility::Protected
        } else {
            Visibility::Public
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Protected => '#',
            Visibility::Private => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Attribute,
}

/// A method or attribute line in a class box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
}

impl MemberEntry {
    pub fn method(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Method,
            visibility: Visibility::of_method(name),
        }
    }

    pub fn attribute(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Attribute,
            visibility: Visibility::of_attribute(name),
        }
    }
}

impl fmt::Display for MemberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{} {}()", self.visibility.glyph(), self.name),
            MemberKind::Attribute => write!(f, "{} {}", self.visibility.glyph(), self.name),
        }
    }
}

/// Structure of one class definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    /// Methods in source order
    pub methods: Vec<MemberEntry>,
    /// Class-body attributes in source order
    pub attributes: Vec<MemberEntry>,
}

impl ClassRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Build a record from a class body
    ///
    /// Only statements directly in the body count; assignments to `self.x`
    /// inside methods are not attributes here, and `async def` is skipped.
    pub fn from_body(name: &str, body: &[Statement]) -> Self {
        let mut record = Self::new(name);
        for statement in body {
            match statement {
                Statement::FunctionDef { name, .. } => {
                    record.methods.push(MemberEntry::method(name));
                }
                Statement::Assign { targets } => {
                    for target in targets.iter().filter_map(|t| t.name()) {
                        record.attributes.push(MemberEntry::attribute(target));
                    }
                }
                Statement::AnnAssign { target } => {
                    if let Some(name) = target.name() {
                        record.attributes.push(MemberEntry::attribute(name));
                    }
                }
                _ => {}
            }
        }
        record
    }
}

/// Extract one record per top-level class, in source order
pub fn extract_classes(unit: &SourceUnit) -> Vec<ClassRecord> {
    unit.body
        .iter()
        .filter_map(|statement| match statement {
            Statement::ClassDef { name, body } => Some(ClassRecord::from_body(name, body)),
            _ => None,
        })
        .collect()
}
