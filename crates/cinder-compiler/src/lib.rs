//! Cinder component compiler
//!
//! This crate lowers the reactive declarations of a component's instance
//! script into calls to the client runtime:
//! - **AST**: Script tree, fold infrastructure and printer (`ast` module)
//! - **Scope**: Scope tree, binding classification and rune detection (`scope` module)
//! - **Transform**: Declaration lowering (`transform` module)
//! - **Diagnostics**: Error reporting (`diagnostic` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use cinder_compiler::{builders as b, compile_script, CompileOptions, PrettyPrint};
//!
//! // let count = $state(0);
//! let script = vec![b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)])))];
//!
//! let output = compile_script(script, &CompileOptions::default()).unwrap();
//! assert_eq!(output.body.pretty_print(), "let count = $.source(0);");
//! ```

#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Script syntax tree, folds and printer
pub mod ast;

/// Synthetic node construction
pub mod builders;

/// Scopes, bindings and analysis
pub mod scope;

/// Reactive declaration lowering
pub mod transform;

// ============================================================================
// Support Modules
// ============================================================================

pub mod diagnostic;
pub mod error;
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use ast::{PrettyPrint, Script, Statement};
pub use diagnostic::Diagnostic;
pub use error::{BindError, CompileError, CompileJsonError, CompileResult, TransformError, TransformResult};
pub use options::CompileOptions;
pub use scope::{analyze_script, Analysis, ScopeTree};
pub use transform::{transform_script, TransformOutput};

use tracing::instrument;

/// Analyze and transform an instance script in one step
#[instrument(level = "debug", skip_all, fields(statements = statements.len()))]
pub fn compile_script(mut statements: Vec<Statement>, options: &CompileOptions) -> CompileResult<TransformOutput> {
    let (mut scopes, analysis) = analyze_script(&mut statements, options)?;
    let output = transform_script(statements, &mut scopes, &analysis, options)?;
    Ok(output)
}

/// Compile a script given in its JSON interchange form
pub fn compile_json(source: &str, options: &CompileOptions) -> Result<TransformOutput, CompileJsonError> {
    let script = Script::from_json(source)?;
    Ok(compile_script(script.statements, options)?)
}

