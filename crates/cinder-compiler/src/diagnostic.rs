//! Diagnostic rendering for compiler errors
//!
//! Wraps codespan-reporting so errors can be shown against the component
//! source with labels and error codes.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use termcolor::{ColorChoice, NoColor, StandardStream};

use crate::ast::Span;
use crate::error::{BindError, CompileError, TransformError};

/// Error code for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.0);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::primary(file_id, span.start..span.end).with_message(message));
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::secondary(file_id, span.start..span.end).with_message(message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    pub fn from_transform_error(error: &TransformError, file_id: usize) -> Self {
        use TransformError::*;

        let diag = Diagnostic::error(error.to_string()).with_code(error_code(error));
        match error {
            UnexpectedPattern { expected, span, .. } => diag
                .with_primary_label(file_id, *span, format!("expected {}", expected))
                .with_note("analysis should have rejected this declaration"),
            MissingBinding { span, .. } => diag.with_primary_label(file_id, *span, "not declared in any enclosing scope"),
            MissingInitializer { span, .. } => diag.with_primary_label(file_id, *span, "declared here"),
        }
    }

    pub fn from_bind_error(error: &BindError, file_id: usize) -> Self {
        match error {
            BindError::DuplicateBinding {
                name,
                original,
                duplicate,
            } => Diagnostic::error(format!("Identifier '{}' has already been declared", name))
                .with_code(ErrorCode("C0101"))
                .with_primary_label(file_id, *duplicate, "duplicate declaration")
                .with_secondary_label(file_id, *original, "first declaration here"),
        }
    }

    /// One diagnostic per underlying error
    pub fn from_compile_error(error: &CompileError, file_id: usize) -> Vec<Self> {
        match error {
            CompileError::Bind(errors) => errors.iter().map(|e| Self::from_bind_error(e, file_id)).collect(),
            CompileError::Transform(e) => vec![Self::from_transform_error(e, file_id)],
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)
    }

    /// Render without colors, for logs and tests
    pub fn render(&self, files: &SimpleFiles<String, String>) -> Result<String, codespan_reporting::files::Error> {
        let mut writer = NoColor::new(Vec::new());
        let config = term::Config::default();
        term::emit(&mut writer, &config, files, &self.inner)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

/// Get error code for a TransformError
pub fn error_code(error: &TransformError) -> ErrorCode {
    match error {
        TransformError::UnexpectedPattern { .. } => ErrorCode("C0001"),
        TransformError::MissingBinding { .. } => ErrorCode("C0002"),
        TransformError::MissingInitializer { .. } => ErrorCode("C0003"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(name: impl Into<String>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}
