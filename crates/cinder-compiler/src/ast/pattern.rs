//! Pattern AST nodes
//!
//! Patterns are used in variable declarations, function parameters, and destructuring.

use super::*;

/// Pattern (for destructuring and binding)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Simple identifier: x
    Identifier(Identifier),

    /// Array destructuring: [x, y = 1, ...rest]
    Array(ArrayPattern),

    /// Object destructuring: { x, y: z = 1, ...rest }
    Object(ObjectPattern),
}

impl Pattern {
    pub fn span(&self) -> &Span {
        match self {
            Pattern::Identifier(id) => &id.span,
            Pattern::Array(p) => &p.span,
            Pattern::Object(p) => &p.span,
        }
    }

    /// Short node name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Pattern::Identifier(_) => "identifier",
            Pattern::Array(_) => "array pattern",
            Pattern::Object(_) => "object pattern",
        }
    }

    /// Every identifier this pattern binds, in source order
    pub fn identifiers(&self) -> Vec<&Identifier> {
        let mut out = Vec::new();
        collect_identifiers(self, &mut out);
        out
    }

    /// Every default-value expression in this pattern, outermost first
    pub fn defaults(&self) -> Vec<&Expression> {
        let mut out = Vec::new();
        collect_defaults(self, &mut out);
        out
    }
}

impl From<Identifier> for Pattern {
    fn from(id: Identifier) -> Self {
        Pattern::Identifier(id)
    }
}

fn collect_identifiers<'a>(pattern: &'a Pattern, out: &mut Vec<&'a Identifier>) {
    match pattern {
        Pattern::Identifier(id) => out.push(id),
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                collect_identifiers(&element.pattern, out);
            }
            if let Some(rest) = &array.rest {
                collect_identifiers(rest, out);
            }
        }
        Pattern::Object(object) => {
            for property in &object.properties {
                collect_identifiers(&property.value, out);
            }
            if let Some(rest) = &object.rest {
                out.push(rest);
            }
        }
    }
}

fn collect_defaults<'a>(pattern: &'a Pattern, out: &mut Vec<&'a Expression>) {
    match pattern {
        Pattern::Identifier(_) => {}
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                out.extend(element.default.as_ref());
                collect_defaults(&element.pattern, out);
            }
            if let Some(rest) = &array.rest {
                collect_defaults(rest, out);
            }
        }
        Pattern::Object(object) => {
            for property in &object.properties {
                if let PropertyKey::Computed(key) = &property.key {
                    out.push(key);
                }
                out.extend(property.default.as_ref());
                collect_defaults(&property.value, out);
            }
        }
    }
}

/// Array destructuring pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayPattern {
    /// Elements; `None` marks a hole: [a, , c]
    pub elements: Vec<Option<PatternElement>>,
    /// Trailing rest element: [...rest]
    pub rest: Option<Box<Pattern>>,
    pub span: Span,
}

/// Array pattern element with optional default: [y = 10]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternElement {
    pub pattern: Pattern,
    pub default: Option<Expression>,
    pub span: Span,
}

/// Object destructuring pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    /// Trailing rest element: { ...rest }
    pub rest: Option<Identifier>,
    pub span: Span,
}

/// { key: value = default }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
    pub default: Option<Expression>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use crate::builders as b;

    #[test]
    fn test_identifiers_in_source_order() {
        // { a, b: [c, , d = 1, ...e], ...f }
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), None),
                b::prop_pattern(
                    "b",
                    b::array_pattern(
                        vec![
                            Some(b::element(b::id("c"), None)),
                            None,
                            Some(b::element(b::id("d"), Some(b::number(1.0)))),
                        ],
                        Some(b::id("e").into()),
                    ),
                    None,
                ),
            ],
            Some(b::id("f")),
        );

        let names: Vec<&str> = pattern.identifiers().iter().map(|id| id.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_defaults_collected() {
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), Some(b::number(1.0))),
                b::prop_pattern("b", b::id("b"), None),
            ],
            None,
        );
        assert_eq!(pattern.defaults(), vec![&b::number(1.0)]);
    }
}
