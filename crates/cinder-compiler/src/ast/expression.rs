//! Expression AST nodes
//!
//! This module defines all expression types a component script can contain:
//! - Literal expressions (numbers, strings, booleans, arrays, objects)
//! - Unary, binary and logical operations
//! - Function calls and member access
//! - Arrow functions and function expressions

use super::*;
use crate::scope::ScopeId;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Number literal: 42, 3.14
    NumberLiteral(NumberLiteral),

    /// String literal: "hello"
    StringLiteral(StringLiteral),

    /// Template literal: `Hello, ${name}!`
    TemplateLiteral(TemplateLiteral),

    /// Boolean literal: true, false
    BooleanLiteral(BooleanLiteral),

    /// Null literal
    NullLiteral(Span),

    /// Identifier
    Identifier(Identifier),

    /// Array literal: [1, 2, 3]
    Array(ArrayExpression),

    /// Object literal: { x: 1, y: 2 }
    Object(ObjectExpression),

    /// Unary expression: !x, -y, ++z
    Unary(UnaryExpression),

    /// Binary expression: x + y, a * b
    Binary(BinaryExpression),

    /// Logical expression: x && y, a || b
    Logical(LogicalExpression),

    /// Assignment: x = 42, y += 1
    Assignment(AssignmentExpression),

    /// Ternary: x ? y : z
    Conditional(ConditionalExpression),

    /// Function call: foo(1, 2, 3)
    Call(CallExpression),

    /// Member access: obj.prop
    Member(MemberExpression),

    /// Computed member access: arr[0]
    Index(IndexExpression),

    /// Arrow function: (x) => x + 1
    Arrow(ArrowFunction),

    /// Function expression: function (x) { return x; }
    Function(FunctionExpression),

    /// Comma sequence: a, b
    Sequence(SequenceExpression),

    /// Parenthesized: (expr)
    Parenthesized(ParenthesizedExpression),

    /// This expression: this
    This(Span),
}

impl Expression {
    /// Get the span of this expression
    pub fn span(&self) -> &Span {
        match self {
            Expression::NumberLiteral(e) => &e.span,
            Expression::StringLiteral(e) => &e.span,
            Expression::TemplateLiteral(e) => &e.span,
            Expression::BooleanLiteral(e) => &e.span,
            Expression::NullLiteral(span) => span,
            Expression::Identifier(e) => &e.span,
            Expression::Array(e) => &e.span,
            Expression::Object(e) => &e.span,
            Expression::Unary(e) => &e.span,
            Expression::Binary(e) => &e.span,
            Expression::Logical(e) => &e.span,
            Expression::Assignment(e) => &e.span,
            Expression::Conditional(e) => &e.span,
            Expression::Call(e) => &e.span,
            Expression::Member(e) => &e.span,
            Expression::Index(e) => &e.span,
            Expression::Arrow(e) => &e.span,
            Expression::Function(e) => &e.span,
            Expression::Sequence(e) => &e.span,
            Expression::Parenthesized(e) => &e.span,
            Expression::This(span) => span,
        }
    }

    /// Check if this expression is a primitive literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::NumberLiteral(_)
                | Expression::StringLiteral(_)
                | Expression::BooleanLiteral(_)
                | Expression::NullLiteral(_)
        )
    }

    /// Check if this expression is a simple identifier
    pub fn is_identifier(&self) -> bool {
        matches!(self, Expression::Identifier(_))
    }

    /// Check if this expression is an arrow function or function expression
    pub fn is_function(&self) -> bool {
        matches!(self, Expression::Arrow(_) | Expression::Function(_))
    }

    /// Short node name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::NumberLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_) => "literal",
            Expression::TemplateLiteral(_) => "template literal",
            Expression::Identifier(_) => "identifier",
            Expression::Array(_) => "array expression",
            Expression::Object(_) => "object expression",
            Expression::Unary(_) => "unary expression",
            Expression::Binary(_) => "binary expression",
            Expression::Logical(_) => "logical expression",
            Expression::Assignment(_) => "assignment expression",
            Expression::Conditional(_) => "conditional expression",
            Expression::Call(_) => "call expression",
            Expression::Member(_) | Expression::Index(_) => "member expression",
            Expression::Arrow(_) => "arrow function",
            Expression::Function(_) => "function expression",
            Expression::Sequence(_) => "sequence expression",
            Expression::Parenthesized(_) => "parenthesized expression",
            Expression::This(_) => "this",
        }
    }

    /// Visit the immediate sub-expressions of this node.
    ///
    /// Function bodies and parameter defaults are not visited: they live in
    /// their own scope and callers handle them explicitly.
    pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a Expression)) {
        match self {
            Expression::TemplateLiteral(e) => e.expressions.iter().for_each(f),
            Expression::Array(e) => {
                for element in e.elements.iter().flatten() {
                    match element {
                        ArrayElement::Expression(expr) | ArrayElement::Spread(expr) => f(expr),
                    }
                }
            }
            Expression::Object(e) => {
                for property in &e.properties {
                    match property {
                        ObjectProperty::Property(p) => {
                            if let PropertyKey::Computed(key) = &p.key {
                                f(key);
                            }
                            f(&p.value);
                        }
                        ObjectProperty::Spread(s) => f(&s.argument),
                    }
                }
            }
            Expression::Unary(e) => f(&e.operand),
            Expression::Binary(e) => {
                f(&e.left);
                f(&e.right);
            }
            Expression::Logical(e) => {
                f(&e.left);
                f(&e.right);
            }
            Expression::Assignment(e) => {
                f(&e.left);
                f(&e.right);
            }
            Expression::Conditional(e) => {
                f(&e.test);
                f(&e.consequent);
                f(&e.alternate);
            }
            Expression::Call(e) => {
                f(&e.callee);
                e.arguments.iter().for_each(f);
            }
            Expression::Member(e) => f(&e.object),
            Expression::Index(e) => {
                f(&e.object);
                f(&e.index);
            }
            Expression::Sequence(e) => e.expressions.iter().for_each(f),
            Expression::Parenthesized(e) => f(&e.expression),
            Expression::NumberLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::Identifier(_)
            | Expression::Arrow(_)
            | Expression::Function(_)
            | Expression::This(_) => {}
        }
    }

    /// Mutable counterpart of [`Expression::for_each_child`]
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut Expression)) {
        match self {
            Expression::TemplateLiteral(e) => e.expressions.iter_mut().for_each(f),
            Expression::Array(e) => {
                for element in e.elements.iter_mut().flatten() {
                    match element {
                        ArrayElement::Expression(expr) | ArrayElement::Spread(expr) => f(expr),
                    }
                }
            }
            Expression::Object(e) => {
                for property in &mut e.properties {
                    match property {
                        ObjectProperty::Property(p) => {
                            if let PropertyKey::Computed(key) = &mut p.key {
                                f(key);
                            }
                            f(&mut p.value);
                        }
                        ObjectProperty::Spread(s) => f(&mut s.argument),
                    }
                }
            }
            Expression::Unary(e) => f(&mut e.operand),
            Expression::Binary(e) => {
                f(&mut e.left);
                f(&mut e.right);
            }
            Expression::Logical(e) => {
                f(&mut e.left);
                f(&mut e.right);
            }
            Expression::Assignment(e) => {
                f(&mut e.left);
                f(&mut e.right);
            }
            Expression::Conditional(e) => {
                f(&mut e.test);
                f(&mut e.consequent);
                f(&mut e.alternate);
            }
            Expression::Call(e) => {
                f(&mut e.callee);
                e.arguments.iter_mut().for_each(f);
            }
            Expression::Member(e) => f(&mut e.object),
            Expression::Index(e) => {
                f(&mut e.object);
                f(&mut e.index);
            }
            Expression::Sequence(e) => e.expressions.iter_mut().for_each(f),
            Expression::Parenthesized(e) => f(&mut e.expression),
            Expression::NumberLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::Identifier(_)
            | Expression::Arrow(_)
            | Expression::Function(_)
            | Expression::This(_) => {}
        }
    }
}

impl From<Identifier> for Expression {
    fn from(id: Identifier) -> Self {
        Expression::Identifier(id)
    }
}

// ============================================================================
// Literal Expressions
// ============================================================================

/// Number literal: 42, 0.5
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: f64,
    pub span: Span,
}

/// String literal: "hello"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

/// Template literal: `Hello, ${name}!`
///
/// `quasis` always holds one more entry than `expressions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteral {
    pub quasis: Vec<String>,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

/// Boolean literal: true, false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

// ============================================================================
// Array and Object Expressions
// ============================================================================

/// Array expression: [1, 2, 3], [...arr1, ...arr2]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpression {
    pub elements: Vec<Option<ArrayElement>>,
    pub span: Span,
}

/// Array element (expression or spread)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayElement {
    /// Expression element: 1
    Expression(Expression),
    /// Spread element: ...arr
    Spread(Expression),
}

/// Object expression: { x: 1, y: 2 }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectProperty>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectProperty {
    Property(Property),
    Spread(SpreadProperty),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expression,
    pub span: Span,
}

/// Property name in object literals and object patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyKey {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    NumberLiteral(NumberLiteral),
    /// Computed property name: [expr]
    Computed(Expression),
}

impl PropertyKey {
    /// The statically known property name, if any
    pub fn static_name(&self) -> Option<String> {
        match self {
            PropertyKey::Identifier(id) => Some(id.name.clone()),
            PropertyKey::StringLiteral(s) => Some(s.value.clone()),
            PropertyKey::NumberLiteral(n) => Some(format_number(n.value)),
            PropertyKey::Computed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadProperty {
    pub argument: Expression,
    pub span: Span,
}

// ============================================================================
// Unary, Binary & Logical Expressions
// ============================================================================

/// Unary expression: !x, -y, ++z
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,             // +x
    Minus,            // -x
    Not,              // !x
    BitwiseNot,       // ~x
    Typeof,           // typeof x
    Void,             // void x
    PrefixIncrement,  // ++x
    PrefixDecrement,  // --x
    PostfixIncrement, // x++
    PostfixDecrement, // x--
}

impl UnaryOperator {
    /// Whether the operator writes back to its operand
    pub fn is_update(self) -> bool {
        matches!(
            self,
            UnaryOperator::PrefixIncrement
                | UnaryOperator::PrefixDecrement
                | UnaryOperator::PostfixIncrement
                | UnaryOperator::PostfixDecrement
        )
    }

    pub fn is_postfix(self) -> bool {
        matches!(
            self,
            UnaryOperator::PostfixIncrement | UnaryOperator::PostfixDecrement
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::PrefixIncrement | UnaryOperator::PostfixIncrement => "++",
            UnaryOperator::PrefixDecrement | UnaryOperator::PostfixDecrement => "--",
        }
    }
}

/// Binary expression: x + y, a * b
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Arithmetic
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Modulo,   // %
    Exponent, // **

    // Comparison
    Equal,          // ==
    NotEqual,       // !=
    StrictEqual,    // ===
    StrictNotEqual, // !==
    LessThan,       // <
    LessEqual,      // <=
    GreaterThan,    // >
    GreaterEqual,   // >=

    // Bitwise
    BitwiseAnd,         // &
    BitwiseOr,          // |
    BitwiseXor,         // ^
    LeftShift,          // <<
    RightShift,         // >>
    UnsignedRightShift, // >>>
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::UnsignedRightShift => ">>>",
        }
    }
}

/// Logical expression: x && y, a || b
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpression {
    pub operator: LogicalOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,               // &&
    Or,                // ||
    NullishCoalescing, // ??
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::NullishCoalescing => "??",
        }
    }
}

/// Assignment expression: x = 42, y += 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpression {
    pub operator: AssignmentOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOperator {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
    MulAssign, // *=
    DivAssign, // /=
    OrAssign,  // ||=
    AndAssign, // &&=
    NullishAssign, // ??=
}

impl AssignmentOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::AddAssign => "+=",
            AssignmentOperator::SubAssign => "-=",
            AssignmentOperator::MulAssign => "*=",
            AssignmentOperator::DivAssign => "/=",
            AssignmentOperator::OrAssign => "||=",
            AssignmentOperator::AndAssign => "&&=",
            AssignmentOperator::NullishAssign => "??=",
        }
    }
}

// ============================================================================
// Complex Expressions
// ============================================================================

/// Conditional (ternary): x ? y : z
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

/// Function call: foo(1, 2, 3)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// Member access: obj.prop, obj?.prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    pub optional: bool, // obj?.prop
    pub span: Span,
}

/// Index access: arr[0], obj['key']
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpression {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}

/// Comma sequence: (a, b)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

/// Parenthesized expression: (expr)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedExpression {
    pub expression: Box<Expression>,
    pub span: Span,
}

// ============================================================================
// Functions
// ============================================================================

/// Facts about a function node recorded during analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionMetadata {
    /// The function captures no per-instance state and may be moved to module level
    pub hoistable: bool,
    /// Scope holding the function's parameters and body declarations
    pub scope: Option<ScopeId>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub pattern: Pattern,
    /// Default value for the parameter (e.g., `x = 10`)
    pub default_value: Option<Expression>,
    pub span: Span,
}

/// Arrow function: (x) => x + 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowFunction {
    pub params: Vec<Parameter>,
    pub body: ArrowBody,
    pub is_async: bool,
    #[serde(default)]
    pub metadata: FunctionMetadata,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    Expression(Box<Expression>),
    Block(BlockStatement),
}

/// Function expression: function name(x) { ... }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub name: Option<Identifier>,
    pub params: Vec<Parameter>,
    pub body: BlockStatement,
    pub is_async: bool,
    #[serde(default)]
    pub metadata: FunctionMetadata,
    pub span: Span,
}

/// Render a number the way JavaScript source spells it
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
