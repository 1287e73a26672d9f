//! Scopes and bindings
//!
//! Scopes live in an arena indexed by [`ScopeId`]. Each scope records the
//! names it declares and the names referenced inside it. Lookup walks parent
//! links; fresh-name generation checks the scope itself plus a tree-wide
//! conflict set, so generated names never shadow or collide with anything
//! the script mentions.

pub mod binder;
pub mod runes;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use unicode_xid::UnicodeXID;

use crate::ast::{Expression, Identifier, Span, VariableDeclarator, VariableKind};
use crate::error::{BindError, TransformError, TransformResult};

pub use binder::{analyze_script, Analysis};
pub use runes::{get_rune, Rune};

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top level of the component's instance script
    Instance,
    /// Function parameters and body
    Function,
    /// Nested block
    Block,
}

/// Reactivity role of a declared name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Plain variable
    Normal,
    /// Mutable reactive state
    State,
    /// Reactive state whose value is frozen rather than proxied
    FrozenState,
    /// Derived value
    Derived,
    /// Prop the parent can bind to or that has a fallback
    BindableProp,
    /// Prop read straight from the props object
    Prop,
    /// Rest element of a props pattern
    RestProp,
}

/// How a name was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Let,
    Const,
    Var,
    Function,
    Param,
}

impl From<VariableKind> for DeclarationKind {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Let => DeclarationKind::Let,
            VariableKind::Const => DeclarationKind::Const,
            VariableKind::Var => DeclarationKind::Var,
        }
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    pub declaration_kind: DeclarationKind,
    /// Initial value: the initializer of `let x = ...`, or a prop's fallback
    pub initial: Option<Expression>,
    /// Public name when a prop is bound under a different local name
    pub prop_alias: Option<String>,
    pub reassigned: bool,
    pub mutated: bool,
    /// Scope declaring this binding
    pub scope: ScopeId,
    pub span: Span,
}

/// Scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Parent scope (None for the instance scope)
    pub parent: Option<ScopeId>,
    /// Bindings declared directly in this scope
    pub declarations: FxHashMap<String, Binding>,
    /// Names referenced in this scope or any scope nested in it, up to the
    /// scope that declares them
    pub references: FxHashSet<String>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            kind,
            parent,
            declarations: FxHashMap::default(),
            references: FxHashSet::default(),
        }
    }
}

/// Arena of scopes for one compilation unit
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    /// Every name declared, referenced by generation, or reserved anywhere
    conflicts: FxHashSet<String>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a tree holding only the instance scope
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::new(ScopeId(0), ScopeKind::Instance, None)],
            conflicts: FxHashSet::default(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a child of `parent`
    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, kind, Some(parent)));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn bindings_mut(&mut self, scope: ScopeId) -> impl Iterator<Item = &mut Binding> {
        self.scopes[scope.index()].declarations.values_mut()
    }

    /// Nearest enclosing scope that `var` declarations belong to
    pub fn var_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let s = &self.scopes[current.index()];
            match (s.kind, s.parent) {
                (ScopeKind::Block, Some(parent)) => current = parent,
                _ => return current,
            }
        }
    }

    /// Declare `id` in `scope`.
    ///
    /// Redeclaring a name in the same scope is an error unless both
    /// declarations are `var`.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        id: &Identifier,
        kind: BindingKind,
        declaration_kind: DeclarationKind,
        initial: Option<Expression>,
    ) -> Result<(), BindError> {
        let declarations = &mut self.scopes[scope.index()].declarations;

        if let Some(existing) = declarations.get(&id.name) {
            if existing.declaration_kind == DeclarationKind::Var && declaration_kind == DeclarationKind::Var {
                return Ok(());
            }
            return Err(BindError::DuplicateBinding {
                name: id.name.clone(),
                original: existing.span,
                duplicate: id.span,
            });
        }

        declarations.insert(
            id.name.clone(),
            Binding {
                name: id.name.clone(),
                kind,
                declaration_kind,
                initial,
                prop_alias: None,
                reassigned: false,
                mutated: false,
                scope,
                span: id.span,
            },
        );
        self.conflicts.insert(id.name.clone());
        Ok(())
    }

    /// Record a reference to `name` from `scope`.
    ///
    /// The reference is recorded in every scope from `scope` up to and
    /// including the one that declares the name (or the instance scope, for
    /// globals).
    pub fn reference(&mut self, scope: ScopeId, name: &str) {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &mut self.scopes[id.index()];
            scope.references.insert(name.to_string());
            if scope.declarations.contains_key(name) {
                break;
            }
            current = scope.parent;
        }
    }

    /// Scope that declares `name`, as seen from `scope`
    pub fn owner(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if scope.declarations.contains_key(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Resolve `name` from `scope`, walking up the scope chain
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let owner = self.owner(scope, name)?;
        self.scopes[owner.index()].declarations.get(name)
    }

    pub fn get_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Binding> {
        let owner = self.owner(scope, name)?;
        self.scopes[owner.index()].declarations.get_mut(name)
    }

    /// Bindings for every identifier the declarator's pattern introduces, in
    /// source order
    pub fn get_bindings(&self, scope: ScopeId, declarator: &VariableDeclarator) -> TransformResult<Vec<&Binding>> {
        declarator
            .pattern
            .identifiers()
            .into_iter()
            .map(|id| {
                self.get(scope, &id.name).ok_or_else(|| TransformError::MissingBinding {
                    name: id.name.clone(),
                    span: id.span,
                })
            })
            .collect()
    }

    /// Produce a fresh name based on `prefix` that is unused in `scope` and
    /// anywhere else in the tree, and reserve it.
    ///
    /// Names are chosen in a fixed order (`prefix`, `prefix_1`, `prefix_2`,
    /// ...) so the same input always yields the same names.
    pub fn generate(&mut self, scope: ScopeId, prefix: &str) -> String {
        let preferred = sanitize(prefix);
        let mut name = preferred.clone();
        let mut n = 1;

        loop {
            let s = &self.scopes[scope.index()];
            let taken = s.references.contains(&name)
                || s.declarations.contains_key(&name)
                || self.conflicts.contains(&name);
            if !taken {
                break;
            }
            name = format!("{}_{}", preferred, n);
            n += 1;
        }

        self.scopes[scope.index()].references.insert(name.clone());
        self.conflicts.insert(name.clone());
        name
    }
}

fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || UnicodeXID::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '$' || UnicodeXID::is_xid_continue(c)
}

/// Turn an arbitrary string into a valid identifier
fn sanitize(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 1);
    for (i, c) in prefix.chars().enumerate() {
        if i == 0 && !is_ident_start(c) && is_ident_continue(c) {
            out.push('_');
        }
        out.push(if is_ident_continue(c) { c } else { '_' });
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}
