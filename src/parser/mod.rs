// Parser module: Python source to statement tree

pub mod ast;
mod python;

pub use ast::*;
pub use python::PythonParser;
