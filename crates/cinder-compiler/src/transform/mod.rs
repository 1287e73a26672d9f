//! Client transform
//!
//! Lowers reactive declarations of an analyzed instance script into calls
//! to the client runtime. The pass is a [`Fold`] over the whole script:
//! variable declarations are rewritten by [`variable_declaration`], every
//! other node is rebuilt unchanged apart from the declarations nested in it.
//! Functions that capture nothing are moved out of the body into
//! [`TransformOutput::hoisted`].

use tracing::{debug, instrument};

use crate::ast::*;
use crate::error::{TransformError, TransformResult};
use crate::options::CompileOptions;
use crate::scope::{Analysis, Binding, ScopeId, ScopeTree};

pub mod paths;
pub mod utils;
mod variable_declaration;

pub use paths::{extract_paths, Accessor, DestructuringPath};
pub use variable_declaration::variable_declaration;

/// Mutable state of one compilation unit, threaded through the fold
pub struct TransformState<'a> {
    pub scopes: &'a mut ScopeTree,
    /// Scope names are resolved against
    pub scope: ScopeId,
    pub analysis: &'a Analysis,
    pub options: &'a CompileOptions,
    /// Declarations moved to module level, in the order they were found
    pub hoisted: Vec<Statement>,
}

impl<'a> TransformState<'a> {
    pub fn new(scopes: &'a mut ScopeTree, analysis: &'a Analysis, options: &'a CompileOptions) -> Self {
        Self {
            scopes,
            scope: analysis.instance_scope,
            analysis,
            options,
            hoisted: Vec::new(),
        }
    }

    /// Binding `id` resolves to from the current scope
    pub fn binding(&self, id: &Identifier) -> TransformResult<Binding> {
        self.scopes
            .get(self.scope, &id.name)
            .cloned()
            .ok_or_else(|| TransformError::MissingBinding {
                name: id.name.clone(),
                span: id.span,
            })
    }

    /// Fresh identifier unique within the unit
    pub fn generate(&mut self, prefix: &str) -> Identifier {
        let name = self.scopes.generate(self.scope, prefix);
        Identifier::new(name, Span::dummy())
    }
}

/// The declaration-lowering fold
pub struct ClientTransform<'a> {
    pub state: TransformState<'a>,
}

impl<'a> ClientTransform<'a> {
    pub fn new(state: TransformState<'a>) -> Self {
        Self { state }
    }

    /// Run `f` with `scope` as the current scope, if one was recorded
    fn with_scope<T>(
        &mut self,
        scope: Option<ScopeId>,
        f: impl FnOnce(&mut Self) -> TransformResult<T>,
    ) -> TransformResult<T> {
        let Some(scope) = scope else {
            return f(self);
        };
        let previous = std::mem::replace(&mut self.state.scope, scope);
        let result = f(self);
        self.state.scope = previous;
        result
    }
}

impl Fold for ClientTransform<'_> {
    type Error = TransformError;

    fn fold_variable_decl(&mut self, decl: VariableDecl) -> TransformResult<Statement> {
        variable_declaration(decl, self)
    }

    fn fold_export_named(&mut self, export: ExportNamedDecl) -> TransformResult<Statement> {
        match export.declaration {
            Some(declaration) => self.fold_statement(*declaration),
            None => Ok(Statement::Empty(export.span)),
        }
    }

    fn fold_function_decl(&mut self, func: FunctionDecl) -> TransformResult<FunctionDecl> {
        self.with_scope(func.metadata.scope, |t| walk_function_decl(t, func))
    }

    fn fold_arrow_function(&mut self, func: ArrowFunction) -> TransformResult<ArrowFunction> {
        self.with_scope(func.metadata.scope, |t| walk_arrow_function(t, func))
    }

    fn fold_function_expression(&mut self, func: FunctionExpression) -> TransformResult<FunctionExpression> {
        self.with_scope(func.metadata.scope, |t| walk_function_expression(t, func))
    }

    fn fold_block(&mut self, block: BlockStatement) -> TransformResult<BlockStatement> {
        self.with_scope(block.scope, |t| walk_block(t, block))
    }
}

/// Result of transforming one instance script
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformOutput {
    /// The rewritten instance body
    pub body: Vec<Statement>,
    /// Module-level declarations lifted out of the body
    pub hoisted: Vec<Statement>,
}

/// Lower every reactive declaration in an analyzed script
#[instrument(level = "debug", skip_all, fields(statements = statements.len(), runes = analysis.runes))]
pub fn transform_script(
    statements: Vec<Statement>,
    scopes: &mut ScopeTree,
    analysis: &Analysis,
    options: &CompileOptions,
) -> TransformResult<TransformOutput> {
    let mut transform = ClientTransform::new(TransformState::new(scopes, analysis, options));
    let body: Vec<Statement> = transform
        .fold_statements(statements)?
        .into_iter()
        .filter(|stmt| !stmt.is_empty())
        .collect();

    let hoisted = transform.state.hoisted;
    debug!(body = body.len(), hoisted = hoisted.len(), "transform complete");

    Ok(TransformOutput { body, hoisted })
}
