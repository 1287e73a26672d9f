//! Compilation errors

use thiserror::Error;

use crate::ast::Span;

pub type TransformResult<T> = Result<T, TransformError>;

pub type CompileResult<T> = Result<T, CompileError>;

/// Structural assertion failures raised while lowering declarations.
///
/// These mean the tree handed to the transform does not have the shape
/// analysis guarantees; compilation of the unit stops.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransformError {
    #[error("Expected {expected}, found {found}")]
    UnexpectedPattern {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    #[error("No binding for '{name}'")]
    MissingBinding { name: String, span: Span },

    #[error("{rune} declaration has no initializer")]
    MissingInitializer { rune: &'static str, span: Span },
}

impl TransformError {
    pub fn span(&self) -> Span {
        match self {
            TransformError::UnexpectedPattern { span, .. }
            | TransformError::MissingBinding { span, .. }
            | TransformError::MissingInitializer { span, .. } => *span,
        }
    }
}

/// Errors raised while building scopes
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BindError {
    #[error("Duplicate declaration of '{name}'")]
    DuplicateBinding {
        name: String,
        original: Span,
        duplicate: Span,
    },
}

/// Any failure of [`crate::compile_script`]
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Analysis failed with {} error(s)", .0.len())]
    Bind(Vec<BindError>),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl From<Vec<BindError>> for CompileError {
    fn from(errors: Vec<BindError>) -> Self {
        CompileError::Bind(errors)
    }
}

/// Failure of [`crate::compile_json`]
#[derive(Debug, Error)]
pub enum CompileJsonError {
    #[error("Invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
