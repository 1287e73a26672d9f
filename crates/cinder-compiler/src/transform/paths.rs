//! Destructuring path extraction
//!
//! Flattens a binding pattern into one entry per bound identifier. Each
//! entry carries an [`Accessor`]: the chain of reads that, applied to the
//! value being destructured, yields exactly what ordinary destructuring
//! would bind to that identifier. Accessors are independent of each other;
//! each one starts from the same root.

use unicode_xid::UnicodeXID;

use super::utils::is_simple_expression;
use crate::ast::*;
use crate::builders as b;

/// Key excluded from an object rest element
#[derive(Debug, Clone, PartialEq)]
pub enum RestKey {
    Static(String),
    Computed(Expression),
}

/// One read in an accessor chain
#[derive(Debug, Clone, PartialEq)]
pub enum AccessStep {
    /// `value.name`, or `value['name']` when the name is not an identifier
    Property(String),
    /// `value[expr]`
    Computed(Expression),
    /// `value[i]`
    Index(usize),
    /// Default value applied when the value is `undefined`
    Fallback(Expression),
    /// Every own property except the listed keys
    ObjectRest(Vec<RestKey>),
    /// `value.slice(i)`
    ArrayRest(usize),
}

/// Chain of reads from a destructured root to one leaf
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessor {
    steps: Vec<AccessStep>,
}

impl Accessor {
    /// The leaf is the root itself
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    fn with(&self, step: AccessStep) -> Accessor {
        let mut steps = self.steps.clone();
        steps.push(step);
        Accessor { steps }
    }

    /// Build the expression reading this leaf out of `root`
    pub fn apply(&self, root: Expression) -> Expression {
        self.steps.iter().fold(root, |value, step| match step {
            AccessStep::Property(name) if is_identifier_name(name) => b::member(value, name),
            AccessStep::Property(name) => b::member_computed(value, b::string(name)),
            AccessStep::Computed(key) => b::member_computed(value, key.clone()),
            AccessStep::Index(i) => b::member_computed(value, b::number(*i as f64)),
            AccessStep::Fallback(default) if is_simple_expression(default) => {
                b::call("$.fallback", vec![value, default.clone()])
            }
            AccessStep::Fallback(default) => b::call(
                "$.fallback",
                vec![value, b::arrow(vec![], default.clone()), b::boolean(true)],
            ),
            AccessStep::ObjectRest(keys) => {
                let keys = keys
                    .iter()
                    .map(|key| match key {
                        RestKey::Static(name) => b::string(name),
                        RestKey::Computed(expr) => b::call("String", vec![expr.clone()]),
                    })
                    .collect();
                b::call("$.exclude_from_object", vec![value, b::array(keys)])
            }
            AccessStep::ArrayRest(i) => b::call_expr(b::member(value, "slice"), vec![b::number(*i as f64)]),
        })
    }
}

/// A bound identifier and how to read its value
#[derive(Debug, Clone, PartialEq)]
pub struct DestructuringPath {
    pub node: Identifier,
    /// Bound by a rest element
    pub is_rest: bool,
    /// A default value applies somewhere along the path
    pub has_default_value: bool,
    pub accessor: Accessor,
}

/// Flatten `pattern` into one path per bound identifier, in source order
pub fn extract_paths(pattern: &Pattern) -> Vec<DestructuringPath> {
    let mut paths = Vec::new();
    collect_paths(pattern, &Accessor::default(), false, false, &mut paths);
    paths
}

fn collect_paths(
    pattern: &Pattern,
    accessor: &Accessor,
    is_rest: bool,
    has_default_value: bool,
    paths: &mut Vec<DestructuringPath>,
) {
    match pattern {
        Pattern::Identifier(id) => paths.push(DestructuringPath {
            node: id.clone(),
            is_rest,
            has_default_value,
            accessor: accessor.clone(),
        }),
        Pattern::Object(object) => {
            let mut seen = Vec::with_capacity(object.properties.len());
            for property in &object.properties {
                let (step, key) = match &property.key {
                    PropertyKey::Computed(expr) => (AccessStep::Computed(expr.clone()), RestKey::Computed(expr.clone())),
                    key => {
                        let name = key.static_name().unwrap_or_default();
                        (AccessStep::Property(name.clone()), RestKey::Static(name))
                    }
                };
                seen.push(key);
                let mut leaf = accessor.with(step);
                if let Some(default) = &property.default {
                    leaf = leaf.with(AccessStep::Fallback(default.clone()));
                }
                collect_paths(
                    &property.value,
                    &leaf,
                    false,
                    has_default_value || property.default.is_some(),
                    paths,
                );
            }
            if let Some(rest) = &object.rest {
                paths.push(DestructuringPath {
                    node: rest.clone(),
                    is_rest: true,
                    has_default_value,
                    accessor: accessor.with(AccessStep::ObjectRest(seen)),
                });
            }
        }
        Pattern::Array(array) => {
            for (i, element) in array.elements.iter().enumerate() {
                let Some(element) = element else {
                    continue;
                };
                let mut leaf = accessor.with(AccessStep::Index(i));
                if let Some(default) = &element.default {
                    leaf = leaf.with(AccessStep::Fallback(default.clone()));
                }
                collect_paths(
                    &element.pattern,
                    &leaf,
                    false,
                    has_default_value || element.default.is_some(),
                    paths,
                );
            }
            if let Some(rest) = &array.rest {
                let leaf = accessor.with(AccessStep::ArrayRest(array.elements.len()));
                collect_paths(rest, &leaf, true, has_default_value, paths);
            }
        }
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '$' || c == '_' || UnicodeXID::is_xid_start(c) => {
            chars.all(|c| c == '$' || UnicodeXID::is_xid_continue(c))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(pattern: &Pattern) -> Vec<(String, String)> {
        extract_paths(pattern)
            .into_iter()
            .map(|path| (path.node.name, path.accessor.apply(b::id_expr("tmp")).pretty_print()))
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }

    #[test]
    fn test_identifier_is_identity() {
        let paths = extract_paths(&b::id("x").into());
        assert_eq!(paths.len(), 1);
        assert!(paths[0].accessor.is_identity());
        assert_eq!(paths[0].accessor.apply(b::id_expr("root")), b::id_expr("root"));
    }

    #[test]
    fn test_object_members() {
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), None),
                b::prop_pattern("b", b::id("renamed"), None),
            ],
            None,
        );
        assert_eq!(printed(&pattern), pairs(&[("a", "tmp.a"), ("renamed", "tmp.b")]));
    }

    #[test]
    fn test_non_identifier_key_uses_index() {
        let pattern = b::object_pattern(
            vec![ObjectPatternProperty {
                key: PropertyKey::StringLiteral(StringLiteral {
                    value: "data-id".to_string(),
                    span: Span::dummy(),
                }),
                value: b::id("id").into(),
                default: None,
                span: Span::dummy(),
            }],
            None,
        );
        assert_eq!(printed(&pattern), pairs(&[("id", "tmp['data-id']")]));
    }

    #[test]
    fn test_defaults_apply_fallback() {
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), Some(b::number(1.0))),
                b::prop_pattern("b", b::id("b"), Some(b::call("compute", vec![]))),
            ],
            None,
        );
        assert_eq!(
            printed(&pattern),
            pairs(&[
                ("a", "$.fallback(tmp.a, 1)"),
                ("b", "$.fallback(tmp.b, () => compute(), true)"),
            ])
        );
        assert!(extract_paths(&pattern).iter().all(|p| p.has_default_value));
    }

    #[test]
    fn test_object_rest_excludes_seen_keys() {
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), None),
                ObjectPatternProperty {
                    key: PropertyKey::Computed(b::id_expr("key")),
                    value: b::id("dynamic").into(),
                    default: None,
                    span: Span::dummy(),
                },
            ],
            Some(b::id("rest")),
        );
        let paths = extract_paths(&pattern);
        assert_eq!(paths.len(), 3);
        assert!(paths[2].is_rest);
        assert_eq!(
            printed(&pattern),
            pairs(&[
                ("a", "tmp.a"),
                ("dynamic", "tmp[key]"),
                ("rest", "$.exclude_from_object(tmp, ['a', String(key)])"),
            ])
        );
    }

    #[test]
    fn test_array_elements_holes_and_rest() {
        let pattern = b::array_pattern(
            vec![
                Some(b::element(b::id("first"), None)),
                None,
                Some(b::element(b::id("third"), Some(b::number(3.0)))),
            ],
            Some(b::id("others").into()),
        );
        assert_eq!(
            printed(&pattern),
            pairs(&[
                ("first", "tmp[0]"),
                ("third", "$.fallback(tmp[2], 3)"),
                ("others", "tmp.slice(3)"),
            ])
        );
    }

    #[test]
    fn test_nested_patterns_compose_from_root() {
        // { a: [x, { y = 1 }], b }
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern(
                    "a",
                    b::array_pattern(
                        vec![
                            Some(b::element(b::id("x"), None)),
                            Some(b::element(
                                b::object_pattern(vec![b::prop_pattern("y", b::id("y"), Some(b::number(1.0)))], None),
                                None,
                            )),
                        ],
                        None,
                    ),
                    None,
                ),
                b::prop_pattern("b", b::id("b"), None),
            ],
            None,
        );
        assert_eq!(
            printed(&pattern),
            pairs(&[
                ("x", "tmp.a[0]"),
                ("y", "$.fallback(tmp.a[1].y, 1)"),
                ("b", "tmp.b"),
            ])
        );
    }

    #[test]
    fn test_every_leaf_appears_once() {
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), None),
                b::prop_pattern("b", b::array_pattern(vec![Some(b::element(b::id("c"), None))], None), None),
            ],
            Some(b::id("d")),
        );
        let names: Vec<String> = extract_paths(&pattern).into_iter().map(|p| p.node.name).collect();
        let expected: Vec<String> = pattern.identifiers().iter().map(|id| id.name.clone()).collect();
        assert_eq!(names, expected);
    }
}
