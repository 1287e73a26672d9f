//! Statement AST nodes
//!
//! This module defines the statement types a component script can contain:
//! - Variable declarations (let, const, var)
//! - Function declarations
//! - Control flow statements (if, return, blocks)
//! - Export declarations

use super::*;
use crate::scope::ScopeId;

/// Top-level or block-level statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Variable declaration: let/const/var
    VariableDecl(VariableDecl),

    /// Function declaration
    FunctionDecl(FunctionDecl),

    /// Expression statement (e.g., function call)
    Expression(ExpressionStatement),

    /// Return statement
    Return(ReturnStatement),

    /// If statement
    If(IfStatement),

    /// Block statement
    Block(BlockStatement),

    /// Export statement: export let x; export { a as b };
    ExportNamed(ExportNamedDecl),

    /// Empty statement (;)
    Empty(Span),
}

impl Statement {
    /// Get the span of this statement
    pub fn span(&self) -> &Span {
        match self {
            Statement::VariableDecl(s) => &s.span,
            Statement::FunctionDecl(s) => &s.span,
            Statement::Expression(s) => &s.span,
            Statement::Return(s) => &s.span,
            Statement::If(s) => &s.span,
            Statement::Block(s) => &s.span,
            Statement::ExportNamed(s) => &s.span,
            Statement::Empty(span) => span,
        }
    }

    /// Check if this statement is a declaration
    pub fn is_declaration(&self) -> bool {
        matches!(self, Statement::VariableDecl(_) | Statement::FunctionDecl(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Statement::Empty(_))
    }
}

// ============================================================================
// Variable Declaration
// ============================================================================

/// Variable declaration: let x = 42, y; or const { a } = obj;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    /// let, const or var
    pub kind: VariableKind,

    /// One or more declarators, in source order
    pub declarations: Vec<VariableDeclarator>,

    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    Let,
    Const,
    Var,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Let => "let",
            VariableKind::Const => "const",
            VariableKind::Var => "var",
        }
    }
}

/// A single `pattern = initializer` pair inside a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    /// Pattern (identifier or destructuring)
    pub pattern: Pattern,

    /// Initializer expression
    pub initializer: Option<Expression>,

    pub span: Span,
}

// ============================================================================
// Function Declaration
// ============================================================================

/// Function declaration
///
/// # Example
/// ```text
/// function add(x, y) {
///     return x + y;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub body: BlockStatement,
    pub is_async: bool,
    #[serde(default)]
    pub metadata: FunctionMetadata,
    pub span: Span,
}

// ============================================================================
// Control Flow
// ============================================================================

/// Expression used as a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

/// Return statement: return x;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

/// If statement: if (cond) { ... } else { ... }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}

/// Block statement: { ... }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    /// Scope for the block's own declarations. Function bodies leave this
    /// unset: they share the function's scope.
    #[serde(default)]
    pub scope: Option<ScopeId>,
    pub span: Span,
}

impl BlockStatement {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self {
            statements,
            scope: None,
            span,
        }
    }
}

// ============================================================================
// Exports
// ============================================================================

/// Named export: `export let x = 1;` or `export { a, b as c };`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNamedDecl {
    pub declaration: Option<Box<Statement>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub span: Span,
}

/// `local as exported` inside an export list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpecifier {
    pub local: Identifier,
    pub exported: Identifier,
    pub span: Span,
}
