//! Abstract Syntax Tree (AST) for component scripts.
//!
//! This module defines the tree the compiler phases operate on:
//! - Statements (declarations, control flow, exports)
//! - Expressions (literals, operators, calls, functions)
//! - Patterns (for destructuring)
//!
//! Every node includes a `Span` for source location tracking. Nodes created
//! by the compiler itself carry `Span::dummy()`.

use serde::{Deserialize, Serialize};

pub mod expression;
pub mod fold;
pub mod pattern;
pub mod printer;
pub mod statement;

pub use expression::*;
pub use fold::*;
pub use pattern::*;
pub use printer::PrettyPrint;
pub use statement::*;

/// Source location of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span for nodes synthesised by the compiler
    pub const fn dummy() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 0,
            column: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: self.column.min(other.column),
        }
    }
}

/// Identifier
///
/// Represents a name for a variable, function, parameter, etc.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Root node: a component's instance script
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    /// Top-level statements
    pub statements: Vec<Statement>,

    /// Span covering the entire script
    pub span: Span,
}

impl Script {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Decode a script from its JSON interchange form
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Encode the script in its JSON interchange form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
