//! Scope analysis - builds the scope tree from a component script
//!
//! The binder runs in three passes over the instance script:
//! 1. Create a scope for every function and block, record it on the node,
//!    and declare every name.
//! 2. Resolve references, track reassignment and mutation, and classify
//!    each binding's reactivity role.
//! 3. Mark top-level function expressions that capture nothing from the
//!    instance scope, other than other hoistable functions, as hoistable.

use rustc_hash::FxHashSet;
use tracing::{debug, instrument, trace};

use super::runes::{get_global_keypath, get_rune, Rune};
use super::{BindingKind, DeclarationKind, ScopeId, ScopeKind, ScopeTree};
use crate::ast::*;
use crate::error::BindError;
use crate::options::CompileOptions;

/// Script-level facts produced by analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Analysis {
    /// Whether the script uses the runes dialect
    pub runes: bool,
    /// Scope of the instance script's top level
    pub instance_scope: ScopeId,
}

/// Analyze a component instance script.
///
/// Fills in `FunctionMetadata` and `BlockStatement::scope` on the tree and
/// returns the scope tree the transform resolves names against.
#[instrument(level = "debug", skip_all, fields(statements = statements.len()))]
pub fn analyze_script(
    statements: &mut [Statement],
    options: &CompileOptions,
) -> Result<(ScopeTree, Analysis), Vec<BindError>> {
    let mut binder = Binder::default();
    let root = binder.scopes.root();

    binder.declare_statements(statements, root);
    if !binder.errors.is_empty() {
        return Err(binder.errors);
    }

    binder.runes = options.runes.unwrap_or_else(|| binder.uses_runes());
    binder.analyze_statements(statements, root);
    if !binder.runes {
        binder.classify_legacy();
    }
    binder.mark_hoistable(statements);

    debug!(runes = binder.runes, scopes = binder.scopes.len(), "analysis complete");

    let analysis = Analysis {
        runes: binder.runes,
        instance_scope: root,
    };
    Ok((binder.scopes, analysis))
}

#[derive(Default)]
struct Binder {
    scopes: ScopeTree,
    errors: Vec<BindError>,
    runes: bool,
    /// Root identifier and scope of every call that looks like a rune
    rune_calls: Vec<(String, ScopeId)>,
    /// Exported local names, with the public name for `export { a as b }`
    exports: Vec<(String, Option<String>)>,
}

impl Binder {
    fn declare(&mut self, scope: ScopeId, id: &Identifier, kind: DeclarationKind, initial: Option<Expression>) {
        if let Err(err) = self.scopes.declare(scope, id, BindingKind::Normal, kind, initial) {
            self.errors.push(err);
        }
    }

    fn set_kind(&mut self, scope: ScopeId, name: &str, kind: BindingKind) {
        if let Some(binding) = self.scopes.get_mut(scope, name) {
            trace!(name, ?kind, "classified binding");
            binding.kind = kind;
        }
    }

    fn uses_runes(&self) -> bool {
        self.rune_calls
            .iter()
            .any(|(root, scope)| self.scopes.get(*scope, root).is_none())
    }

    // ------------------------------------------------------------------
    // Pass 1: scopes and declarations
    // ------------------------------------------------------------------

    fn declare_statements(&mut self, statements: &mut [Statement], scope: ScopeId) {
        for stmt in statements {
            self.declare_statement(stmt, scope);
        }
    }

    fn declare_statement(&mut self, stmt: &mut Statement, scope: ScopeId) {
        match stmt {
            Statement::VariableDecl(decl) => self.declare_variable_decl(decl, scope),
            Statement::FunctionDecl(func) => {
                self.declare(scope, &func.name, DeclarationKind::Function, None);
                let function_scope = self.scopes.push(scope, ScopeKind::Function);
                func.metadata.scope = Some(function_scope);
                self.declare_params(&mut func.params, function_scope);
                self.declare_statements(&mut func.body.statements, function_scope);
            }
            Statement::Expression(stmt) => self.declare_expression(&mut stmt.expression, scope),
            Statement::Return(ret) => {
                if let Some(value) = &mut ret.value {
                    self.declare_expression(value, scope);
                }
            }
            Statement::If(if_stmt) => {
                self.declare_expression(&mut if_stmt.condition, scope);
                self.declare_statement(&mut if_stmt.then_branch, scope);
                if let Some(else_branch) = &mut if_stmt.else_branch {
                    self.declare_statement(else_branch, scope);
                }
            }
            Statement::Block(block) => {
                let block_scope = self.scopes.push(scope, ScopeKind::Block);
                block.scope = Some(block_scope);
                self.declare_statements(&mut block.statements, block_scope);
            }
            Statement::ExportNamed(export) => {
                if let Some(declaration) = &mut export.declaration {
                    if let Statement::VariableDecl(decl) = &**declaration {
                        for declarator in &decl.declarations {
                            for id in declarator.pattern.identifiers() {
                                self.exports.push((id.name.clone(), None));
                            }
                        }
                    }
                    self.declare_statement(declaration, scope);
                }
                for specifier in &export.specifiers {
                    self.exports
                        .push((specifier.local.name.clone(), Some(specifier.exported.name.clone())));
                }
            }
            Statement::Empty(_) => {}
        }
    }

    fn declare_variable_decl(&mut self, decl: &mut VariableDecl, scope: ScopeId) {
        let kind = DeclarationKind::from(decl.kind);
        let target = if decl.kind == VariableKind::Var {
            self.scopes.var_scope(scope)
        } else {
            scope
        };

        for declarator in &mut decl.declarations {
            // Nested functions get their scopes before the initializer is
            // copied onto the binding.
            self.declare_pattern_defaults(&mut declarator.pattern, scope);
            if let Some(init) = &mut declarator.initializer {
                self.declare_expression(init, scope);
            }

            let initial = match declarator.pattern {
                Pattern::Identifier(_) => declarator.initializer.clone(),
                _ => None,
            };
            for id in declarator.pattern.identifiers() {
                if let Err(err) = self.scopes.declare(target, id, BindingKind::Normal, kind, initial.clone()) {
                    self.errors.push(err);
                }
            }
        }
    }

    fn declare_params(&mut self, params: &mut [Parameter], function_scope: ScopeId) {
        for param in params {
            self.declare_pattern_defaults(&mut param.pattern, function_scope);
            if let Some(default) = &mut param.default_value {
                self.declare_expression(default, function_scope);
            }
            for id in param.pattern.identifiers() {
                if let Err(err) =
                    self.scopes
                        .declare(function_scope, id, BindingKind::Normal, DeclarationKind::Param, None)
                {
                    self.errors.push(err);
                }
            }
        }
    }

    fn declare_pattern_defaults(&mut self, pattern: &mut Pattern, scope: ScopeId) {
        match pattern {
            Pattern::Identifier(_) => {}
            Pattern::Array(array) => {
                for element in array.elements.iter_mut().flatten() {
                    if let Some(default) = &mut element.default {
                        self.declare_expression(default, scope);
                    }
                    self.declare_pattern_defaults(&mut element.pattern, scope);
                }
                if let Some(rest) = &mut array.rest {
                    self.declare_pattern_defaults(rest, scope);
                }
            }
            Pattern::Object(object) => {
                for property in &mut object.properties {
                    if let PropertyKey::Computed(key) = &mut property.key {
                        self.declare_expression(key, scope);
                    }
                    if let Some(default) = &mut property.default {
                        self.declare_expression(default, scope);
                    }
                    self.declare_pattern_defaults(&mut property.value, scope);
                }
            }
        }
    }

    fn declare_expression(&mut self, expr: &mut Expression, scope: ScopeId) {
        match expr {
            Expression::Arrow(func) => {
                let function_scope = self.scopes.push(scope, ScopeKind::Function);
                func.metadata.scope = Some(function_scope);
                self.declare_params(&mut func.params, function_scope);
                match &mut func.body {
                    ArrowBody::Expression(body) => self.declare_expression(body, function_scope),
                    ArrowBody::Block(block) => self.declare_statements(&mut block.statements, function_scope),
                }
                return;
            }
            Expression::Function(func) => {
                let function_scope = self.scopes.push(scope, ScopeKind::Function);
                func.metadata.scope = Some(function_scope);
                if let Some(name) = &func.name {
                    self.declare(function_scope, name, DeclarationKind::Function, None);
                }
                self.declare_params(&mut func.params, function_scope);
                self.declare_statements(&mut func.body.statements, function_scope);
                return;
            }
            Expression::Call(call) => {
                if let Some((root, keypath)) = get_global_keypath(&call.callee) {
                    if Rune::from_name(&keypath).is_some() {
                        self.rune_calls.push((root.to_string(), scope));
                    }
                }
            }
            _ => {}
        }
        expr.for_each_child_mut(|child| self.declare_expression(child, scope));
    }

    // ------------------------------------------------------------------
    // Pass 2: references, updates and classification
    // ------------------------------------------------------------------

    fn analyze_statements(&mut self, statements: &[Statement], scope: ScopeId) {
        for stmt in statements {
            self.analyze_statement(stmt, scope);
        }
    }

    fn analyze_statement(&mut self, stmt: &Statement, scope: ScopeId) {
        match stmt {
            Statement::VariableDecl(decl) => {
                for declarator in &decl.declarations {
                    if self.runes {
                        self.classify_runes(declarator, scope);
                    }
                    self.analyze_pattern(&declarator.pattern, scope);
                    if let Some(init) = &declarator.initializer {
                        self.analyze_expression(init, scope);
                    }
                }
            }
            Statement::FunctionDecl(func) => {
                let function_scope = func.metadata.scope.unwrap_or(scope);
                self.analyze_params(&func.params, function_scope);
                self.analyze_statements(&func.body.statements, function_scope);
            }
            Statement::Expression(stmt) => self.analyze_expression(&stmt.expression, scope),
            Statement::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.analyze_expression(value, scope);
                }
            }
            Statement::If(if_stmt) => {
                self.analyze_expression(&if_stmt.condition, scope);
                self.analyze_statement(&if_stmt.then_branch, scope);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.analyze_statement(else_branch, scope);
                }
            }
            Statement::Block(block) => self.analyze_statements(&block.statements, block.scope.unwrap_or(scope)),
            Statement::ExportNamed(export) => {
                if let Some(declaration) = &export.declaration {
                    self.analyze_statement(declaration, scope);
                }
                for specifier in &export.specifiers {
                    self.scopes.reference(scope, &specifier.local.name);
                }
            }
            Statement::Empty(_) => {}
        }
    }

    fn analyze_params(&mut self, params: &[Parameter], function_scope: ScopeId) {
        for param in params {
            self.analyze_pattern(&param.pattern, function_scope);
            if let Some(default) = &param.default_value {
                self.analyze_expression(default, function_scope);
            }
        }
    }

    fn analyze_pattern(&mut self, pattern: &Pattern, scope: ScopeId) {
        for default in pattern.defaults() {
            self.analyze_expression(default, scope);
        }
    }

    fn analyze_expression(&mut self, expr: &Expression, scope: ScopeId) {
        match expr {
            Expression::Identifier(id) => self.scopes.reference(scope, &id.name),
            Expression::Assignment(assign) => self.mark_update_target(&assign.left, scope),
            Expression::Unary(unary) if unary.operator.is_update() => self.mark_update_target(&unary.operand, scope),
            Expression::Arrow(func) => {
                let function_scope = func.metadata.scope.unwrap_or(scope);
                self.analyze_params(&func.params, function_scope);
                match &func.body {
                    ArrowBody::Expression(body) => self.analyze_expression(body, function_scope),
                    ArrowBody::Block(block) => self.analyze_statements(&block.statements, function_scope),
                }
            }
            Expression::Function(func) => {
                let function_scope = func.metadata.scope.unwrap_or(scope);
                self.analyze_params(&func.params, function_scope);
                self.analyze_statements(&func.body.statements, function_scope);
            }
            _ => {}
        }
        expr.for_each_child(|child| self.analyze_expression(child, scope));
    }

    /// `x = ...` reassigns `x`; `x.y = ...` and `x[i]++` mutate it
    fn mark_update_target(&mut self, target: &Expression, scope: ScopeId) {
        match target {
            Expression::Identifier(id) => {
                if let Some(binding) = self.scopes.get_mut(scope, &id.name) {
                    binding.reassigned = true;
                }
            }
            Expression::Member(_) | Expression::Index(_) => {
                let mut object = target;
                loop {
                    object = match object {
                        Expression::Member(member) => &*member.object,
                        Expression::Index(index) => &*index.object,
                        Expression::Parenthesized(paren) => &*paren.expression,
                        _ => break,
                    };
                }
                if let Expression::Identifier(id) = object {
                    if let Some(binding) = self.scopes.get_mut(scope, &id.name) {
                        binding.mutated = true;
                    }
                }
            }
            Expression::Parenthesized(paren) => self.mark_update_target(&paren.expression, scope),
            _ => {}
        }
    }

    fn classify_runes(&mut self, declarator: &VariableDeclarator, scope: ScopeId) {
        let Some(rune) = get_rune(declarator.initializer.as_ref(), &self.scopes, scope) else {
            return;
        };

        let kind = match rune {
            Rune::State => BindingKind::State,
            Rune::StateFrozen => BindingKind::FrozenState,
            Rune::Derived | Rune::DerivedBy => BindingKind::Derived,
            Rune::Props => return self.classify_props(&declarator.pattern, scope),
            _ => return,
        };
        for id in declarator.pattern.identifiers() {
            self.set_kind(scope, &id.name, kind);
        }
    }

    fn classify_props(&mut self, pattern: &Pattern, scope: ScopeId) {
        match pattern {
            Pattern::Identifier(id) => self.set_kind(scope, &id.name, BindingKind::RestProp),
            Pattern::Object(object) => {
                for property in &object.properties {
                    let Pattern::Identifier(id) = &property.value else {
                        continue;
                    };

                    let (kind, initial) = match &property.default {
                        Some(Expression::Call(call))
                            if get_rune(property.default.as_ref(), &self.scopes, scope) == Some(Rune::Bindable) =>
                        {
                            (BindingKind::BindableProp, call.arguments.first().cloned())
                        }
                        default => (BindingKind::Prop, default.clone()),
                    };
                    let alias = property.key.static_name().filter(|key| *key != id.name);

                    if let Some(binding) = self.scopes.get_mut(scope, &id.name) {
                        trace!(name = %id.name, ?kind, "classified prop");
                        binding.kind = kind;
                        binding.initial = initial;
                        binding.prop_alias = alias;
                    }
                }
                if let Some(rest) = &object.rest {
                    self.set_kind(scope, &rest.name, BindingKind::RestProp);
                }
            }
            Pattern::Array(_) => {}
        }
    }

    /// Legacy dialect: exported `let` / `var` become props, top-level
    /// `let` / `var` that are ever written become state
    fn classify_legacy(&mut self) {
        let root = self.scopes.root();

        for (name, exported) in std::mem::take(&mut self.exports) {
            if let Some(binding) = self.scopes.get_mut(root, &name) {
                if matches!(binding.declaration_kind, DeclarationKind::Let | DeclarationKind::Var) {
                    trace!(name = %name, "exported binding becomes a prop");
                    binding.kind = BindingKind::BindableProp;
                    binding.prop_alias = exported.filter(|exported| *exported != name);
                }
            }
        }

        for binding in self.scopes.bindings_mut(root) {
            let writable = matches!(binding.declaration_kind, DeclarationKind::Let | DeclarationKind::Var);
            if writable && binding.kind == BindingKind::Normal && (binding.reassigned || binding.mutated) {
                trace!(name = %binding.name, "written binding becomes state");
                binding.kind = BindingKind::State;
            }
        }
    }

    // ------------------------------------------------------------------
    // Pass 3: hoisting
    // ------------------------------------------------------------------

    fn mark_hoistable(&self, statements: &mut [Statement]) {
        let root = self.scopes.root();

        // Candidates in source order: top-level `Normal` function bindings
        // that are never reassigned.
        let mut candidates: Vec<(String, ScopeId)> = Vec::new();
        for stmt in statements.iter() {
            let Statement::VariableDecl(decl) = stmt else {
                continue;
            };
            for declarator in &decl.declarations {
                let Pattern::Identifier(id) = &declarator.pattern else {
                    continue;
                };
                let eligible = self
                    .scopes
                    .get(root, &id.name)
                    .is_some_and(|binding| binding.kind == BindingKind::Normal && !binding.reassigned);
                if !eligible {
                    continue;
                }
                let function_scope = match &declarator.initializer {
                    Some(Expression::Arrow(func)) => func.metadata.scope,
                    Some(Expression::Function(func)) => func.metadata.scope,
                    _ => None,
                };
                if let Some(function_scope) = function_scope {
                    candidates.push((id.name.clone(), function_scope));
                }
            }
        }

        // A function may call other hoistable functions, so grow the set
        // until it is stable.
        let mut hoistable: FxHashSet<String> = FxHashSet::default();
        loop {
            let before = hoistable.len();
            for (name, function_scope) in &candidates {
                if !hoistable.contains(name) && self.captures_nothing(*function_scope, root, &hoistable) {
                    trace!(name = %name, "function is hoistable");
                    hoistable.insert(name.clone());
                }
            }
            if hoistable.len() == before {
                break;
            }
        }

        for stmt in statements {
            let Statement::VariableDecl(decl) = stmt else {
                continue;
            };
            for declarator in &mut decl.declarations {
                let Pattern::Identifier(id) = &declarator.pattern else {
                    continue;
                };
                let metadata = match &mut declarator.initializer {
                    Some(Expression::Arrow(func)) => &mut func.metadata,
                    Some(Expression::Function(func)) => &mut func.metadata,
                    _ => continue,
                };
                metadata.hoistable = hoistable.contains(&id.name);
            }
        }
    }

    /// Every name referenced inside `function_scope` that resolves to `root`
    /// is itself a hoistable function
    fn captures_nothing(&self, function_scope: ScopeId, root: ScopeId, hoistable: &FxHashSet<String>) -> bool {
        self.scopes
            .scope(function_scope)
            .references
            .iter()
            .all(|name| self.scopes.owner(function_scope, name) != Some(root) || hoistable.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders as b;

    fn analyze(mut statements: Vec<Statement>, options: &CompileOptions) -> (Vec<Statement>, ScopeTree, Analysis) {
        let (scopes, analysis) = analyze_script(&mut statements, options).unwrap();
        (statements, scopes, analysis)
    }

    fn kind_of(scopes: &ScopeTree, name: &str) -> BindingKind {
        scopes.get(scopes.root(), name).unwrap().kind
    }

    #[test]
    fn test_detects_runes_dialect() {
        let (_, _, analysis) = analyze(
            vec![b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)])))],
            &CompileOptions::default(),
        );
        assert!(analysis.runes);

        let (_, _, analysis) = analyze(
            vec![b::let_decl(b::id("count"), Some(b::number(0.0)))],
            &CompileOptions::default(),
        );
        assert!(!analysis.runes);
    }

    #[test]
    fn test_shadowed_rune_does_not_switch_dialect() {
        let (_, _, analysis) = analyze(
            vec![
                b::function_decl("$state", vec![], b::block(vec![])),
                b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)]))),
            ],
            &CompileOptions::default(),
        );
        assert!(!analysis.runes);
    }

    #[test]
    fn test_explicit_dialect_option_wins() {
        let (_, _, analysis) = analyze(
            vec![b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)])))],
            &CompileOptions::default().with_runes(false),
        );
        assert!(!analysis.runes);
    }

    #[test]
    fn test_classifies_state_and_derived() {
        let (_, scopes, _) = analyze(
            vec![
                b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)]))),
                b::let_decl(b::id("frozen"), Some(b::call("$state.frozen", vec![b::array(vec![])]))),
                b::const_decl(b::id("double"), Some(b::call("$derived", vec![b::id_expr("count")]))),
                b::let_decl(b::id("plain"), Some(b::number(1.0))),
            ],
            &CompileOptions::default(),
        );
        assert_eq!(kind_of(&scopes, "count"), BindingKind::State);
        assert_eq!(kind_of(&scopes, "frozen"), BindingKind::FrozenState);
        assert_eq!(kind_of(&scopes, "double"), BindingKind::Derived);
        assert_eq!(kind_of(&scopes, "plain"), BindingKind::Normal);
    }

    #[test]
    fn test_classifies_props_pattern() {
        // let { a, b: renamed = 1, c = $bindable(2), ...rest } = $props();
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), None),
                b::prop_pattern("b", b::id("renamed"), Some(b::number(1.0))),
                b::prop_pattern("c", b::id("c"), Some(b::call("$bindable", vec![b::number(2.0)]))),
            ],
            Some(b::id("rest")),
        );
        let (_, scopes, _) = analyze(
            vec![b::let_decl(pattern, Some(b::call("$props", vec![])))],
            &CompileOptions::default(),
        );

        assert_eq!(kind_of(&scopes, "a"), BindingKind::Prop);
        let renamed = scopes.get(scopes.root(), "renamed").unwrap();
        assert_eq!(renamed.kind, BindingKind::Prop);
        assert_eq!(renamed.prop_alias.as_deref(), Some("b"));
        assert_eq!(renamed.initial, Some(b::number(1.0)));

        let c = scopes.get(scopes.root(), "c").unwrap();
        assert_eq!(c.kind, BindingKind::BindableProp);
        assert_eq!(c.initial, Some(b::number(2.0)));
        assert_eq!(c.prop_alias, None);

        assert_eq!(kind_of(&scopes, "rest"), BindingKind::RestProp);
    }

    #[test]
    fn test_tracks_reassignment_and_mutation() {
        let (_, scopes, _) = analyze(
            vec![
                b::let_decl(b::id("count"), Some(b::number(0.0))),
                b::let_decl(b::id("user"), Some(b::object(vec![]))),
                b::let_decl(b::id("items"), Some(b::array(vec![]))),
                b::expr_stmt(b::unary(UnaryOperator::PostfixIncrement, b::id_expr("count"))),
                b::expr_stmt(b::assign(b::member(b::id_expr("user"), "name"), b::string("x"))),
            ],
            &CompileOptions::default(),
        );
        let root = scopes.root();
        assert!(scopes.get(root, "count").unwrap().reassigned);
        assert!(scopes.get(root, "user").unwrap().mutated);
        assert!(!scopes.get(root, "user").unwrap().reassigned);
        assert!(!scopes.get(root, "items").unwrap().mutated);
    }

    #[test]
    fn test_legacy_classification() {
        let (_, scopes, analysis) = analyze(
            vec![
                b::export(b::let_decl(b::id("title"), Some(b::string("hi")))),
                b::let_decl(b::id("count"), Some(b::number(0.0))),
                b::let_decl(b::id("fixed"), Some(b::number(0.0))),
                b::let_decl(b::id("local"), None),
                b::export_list(vec![("local", "external")]),
                b::function_decl(
                    "increment",
                    vec![],
                    b::block(vec![b::expr_stmt(b::assign(b::id_expr("count"), b::number(1.0)))]),
                ),
            ],
            &CompileOptions::default(),
        );
        assert!(!analysis.runes);
        assert_eq!(kind_of(&scopes, "title"), BindingKind::BindableProp);
        assert_eq!(kind_of(&scopes, "count"), BindingKind::State);
        assert_eq!(kind_of(&scopes, "fixed"), BindingKind::Normal);
        let local = scopes.get(scopes.root(), "local").unwrap();
        assert_eq!(local.kind, BindingKind::BindableProp);
        assert_eq!(local.prop_alias.as_deref(), Some("external"));
    }

    #[test]
    fn test_records_function_and_block_scopes() {
        let (statements, scopes, _) = analyze(
            vec![
                b::let_decl(b::id("f"), Some(b::arrow(vec![b::parameter(b::id("x"))], b::id_expr("x")))),
                b::block_stmt(vec![b::let_decl(b::id("inner"), None)]),
            ],
            &CompileOptions::default(),
        );

        let Statement::VariableDecl(decl) = &statements[0] else {
            panic!("expected declaration");
        };
        let Some(Expression::Arrow(func)) = &decl.declarations[0].initializer else {
            panic!("expected arrow");
        };
        let function_scope = func.metadata.scope.unwrap();
        assert_eq!(scopes.owner(function_scope, "x"), Some(function_scope));

        let Statement::Block(block) = &statements[1] else {
            panic!("expected block");
        };
        let block_scope = block.scope.unwrap();
        assert_eq!(scopes.owner(block_scope, "inner"), Some(block_scope));
        assert!(scopes.get(scopes.root(), "inner").is_none());
    }

    #[test]
    fn test_var_in_block_belongs_to_enclosing_function() {
        let (_, scopes, _) = analyze(
            vec![b::block_stmt(vec![b::var_decl(b::id("hoisted"), None)])],
            &CompileOptions::default(),
        );
        assert!(scopes.get(scopes.root(), "hoisted").is_some());
    }

    #[test]
    fn test_duplicate_declarations_are_reported() {
        let mut statements = vec![
            b::let_decl(b::id("a"), None),
            b::let_decl(b::id("a"), None),
        ];
        let errors = analyze_script(&mut statements, &CompileOptions::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_hoistable_functions() {
        let (statements, _, _) = analyze(
            vec![
                b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)]))),
                // captures nothing
                b::const_decl(
                    b::id("format"),
                    Some(b::arrow(vec![b::parameter(b::id("v"))], b::call("String", vec![b::id_expr("v")]))),
                ),
                // reads instance state
                b::const_decl(b::id("read"), Some(b::arrow(vec![], b::id_expr("count")))),
            ],
            &CompileOptions::default(),
        );

        let hoistable = |index: usize| match &statements[index] {
            Statement::VariableDecl(decl) => match &decl.declarations[0].initializer {
                Some(Expression::Arrow(func)) => func.metadata.hoistable,
                _ => false,
            },
            _ => false,
        };
        assert!(hoistable(1));
        assert!(!hoistable(2));
    }

    #[test]
    fn test_hoistable_functions_may_call_each_other() {
        // twice calls double (hoistable), wrap calls read (reads instance state)
        let (statements, _, _) = analyze(
            vec![
                b::let_decl(b::id("count"), Some(b::number(0.0))),
                b::const_decl(
                    b::id("twice"),
                    Some(b::arrow(
                        vec![b::parameter(b::id("v"))],
                        b::call("double", vec![b::id_expr("v")]),
                    )),
                ),
                b::const_decl(
                    b::id("double"),
                    Some(b::arrow(
                        vec![b::parameter(b::id("v"))],
                        b::binary(BinaryOperator::Multiply, b::id_expr("v"), b::number(2.0)),
                    )),
                ),
                b::const_decl(b::id("read"), Some(b::arrow(vec![], b::id_expr("count")))),
                b::const_decl(b::id("wrap"), Some(b::arrow(vec![], b::call("read", vec![])))),
            ],
            &CompileOptions::default().with_runes(true),
        );

        let hoistable = |index: usize| match &statements[index] {
            Statement::VariableDecl(decl) => match &decl.declarations[0].initializer {
                Some(Expression::Arrow(func)) => func.metadata.hoistable,
                _ => false,
            },
            _ => false,
        };
        assert!(hoistable(1));
        assert!(hoistable(2));
        assert!(!hoistable(3));
        assert!(!hoistable(4));
    }
}
