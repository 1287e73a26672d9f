//! Rune recognition
//!
//! A rune is a call to one of a fixed set of `$`-prefixed globals, such as
//! `$state(0)` or `$derived.by(fn)`. A name only counts as a rune when no
//! binding in scope shadows it.

use super::{ScopeId, ScopeTree};
use crate::ast::Expression;

/// Every rune the compiler knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rune {
    State,
    StateFrozen,
    StateSnapshot,
    StateIs,
    Props,
    Bindable,
    Derived,
    DerivedBy,
    Effect,
    EffectPre,
    EffectTracking,
    EffectRoot,
    Inspect,
    Host,
}

impl Rune {
    pub const ALL: [Rune; 14] = [
        Rune::State,
        Rune::StateFrozen,
        Rune::StateSnapshot,
        Rune::StateIs,
        Rune::Props,
        Rune::Bindable,
        Rune::Derived,
        Rune::DerivedBy,
        Rune::Effect,
        Rune::EffectPre,
        Rune::EffectTracking,
        Rune::EffectRoot,
        Rune::Inspect,
        Rune::Host,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rune::State => "$state",
            Rune::StateFrozen => "$state.frozen",
            Rune::StateSnapshot => "$state.snapshot",
            Rune::StateIs => "$state.is",
            Rune::Props => "$props",
            Rune::Bindable => "$bindable",
            Rune::Derived => "$derived",
            Rune::DerivedBy => "$derived.by",
            Rune::Effect => "$effect",
            Rune::EffectPre => "$effect.pre",
            Rune::EffectTracking => "$effect.tracking",
            Rune::EffectRoot => "$effect.root",
            Rune::Inspect => "$inspect",
            Rune::Host => "$host",
        }
    }

    pub fn from_name(name: &str) -> Option<Rune> {
        Rune::ALL.iter().copied().find(|rune| rune.name() == name)
    }

    /// Whether declarations initialised with this rune are rewritten into
    /// runtime cells. Every other rune passes through unchanged.
    pub fn is_lowered(self) -> bool {
        matches!(
            self,
            Rune::State | Rune::StateFrozen | Rune::Derived | Rune::DerivedBy | Rune::Props
        )
    }
}

impl std::fmt::Display for Rune {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Dotted path of a non-computed member chain rooted at an identifier:
/// `$state.frozen` gives `("$state", "$state.frozen")`
pub fn get_global_keypath(expr: &Expression) -> Option<(&str, String)> {
    match expr {
        Expression::Identifier(id) => Some((id.name.as_str(), id.name.clone())),
        Expression::Member(member) if !member.optional => {
            let (root, mut path) = get_global_keypath(&member.object)?;
            path.push('.');
            path.push_str(&member.property.name);
            Some((root, path))
        }
        _ => None,
    }
}

/// The rune `init` invokes, if any
pub fn get_rune(init: Option<&Expression>, scopes: &ScopeTree, scope: ScopeId) -> Option<Rune> {
    let Some(Expression::Call(call)) = init else {
        return None;
    };

    let (root, keypath) = get_global_keypath(&call.callee)?;
    if !root.starts_with('$') || scopes.get(scope, root).is_some() {
        return None;
    }

    Rune::from_name(&keypath)
}
