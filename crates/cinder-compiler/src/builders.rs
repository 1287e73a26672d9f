//! Builders for synthetic AST nodes
//!
//! Every node built here carries `Span::dummy()`. The transform uses these to
//! assemble its output; tests use them to assemble input scripts.

use crate::ast::*;

const SPAN: Span = Span::dummy();

// ============================================================================
// Identifiers and literals
// ============================================================================

pub fn id(name: &str) -> Identifier {
    Identifier::new(name, SPAN)
}

pub fn id_expr(name: &str) -> Expression {
    Expression::Identifier(id(name))
}

pub fn string(value: &str) -> Expression {
    Expression::StringLiteral(StringLiteral {
        value: value.to_string(),
        span: SPAN,
    })
}

pub fn number(value: f64) -> Expression {
    Expression::NumberLiteral(NumberLiteral { value, span: SPAN })
}

pub fn boolean(value: bool) -> Expression {
    Expression::BooleanLiteral(BooleanLiteral { value, span: SPAN })
}

pub fn null() -> Expression {
    Expression::NullLiteral(SPAN)
}

pub fn undefined() -> Expression {
    id_expr("undefined")
}

pub fn template(quasis: Vec<&str>, expressions: Vec<Expression>) -> Expression {
    Expression::TemplateLiteral(TemplateLiteral {
        quasis: quasis.into_iter().map(String::from).collect(),
        expressions,
        span: SPAN,
    })
}

// ============================================================================
// Calls and member access
// ============================================================================

/// Member chain for a dotted path: `"$.source"` becomes `$.source`
pub fn path(path: &str) -> Expression {
    let mut parts = path.split('.');
    let mut expr = id_expr(parts.next().unwrap_or_default());
    for part in parts {
        expr = member(expr, part);
    }
    expr
}

/// Call a dotted path: `call("$.source", [x])` is `$.source(x)`
pub fn call(callee: &str, arguments: Vec<Expression>) -> Expression {
    call_expr(path(callee), arguments)
}

pub fn call_expr(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::Call(CallExpression {
        callee: Box::new(callee),
        arguments,
        span: SPAN,
    })
}

pub fn member(object: Expression, property: &str) -> Expression {
    Expression::Member(MemberExpression {
        object: Box::new(object),
        property: id(property),
        optional: false,
        span: SPAN,
    })
}

pub fn member_computed(object: Expression, index: Expression) -> Expression {
    Expression::Index(IndexExpression {
        object: Box::new(object),
        index: Box::new(index),
        span: SPAN,
    })
}

// ============================================================================
// Operators
// ============================================================================

pub fn unary(operator: UnaryOperator, operand: Expression) -> Expression {
    Expression::Unary(UnaryExpression {
        operator,
        operand: Box::new(operand),
        span: SPAN,
    })
}

pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: SPAN,
    })
}

pub fn logical(operator: LogicalOperator, left: Expression, right: Expression) -> Expression {
    Expression::Logical(LogicalExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: SPAN,
    })
}

pub fn assign(left: Expression, right: Expression) -> Expression {
    assign_op(AssignmentOperator::Assign, left, right)
}

pub fn assign_op(operator: AssignmentOperator, left: Expression, right: Expression) -> Expression {
    Expression::Assignment(AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: SPAN,
    })
}

pub fn conditional(test: Expression, consequent: Expression, alternate: Expression) -> Expression {
    Expression::Conditional(ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        span: SPAN,
    })
}

pub fn sequence(expressions: Vec<Expression>) -> Expression {
    Expression::Sequence(SequenceExpression {
        expressions,
        span: SPAN,
    })
}

pub fn paren(expression: Expression) -> Expression {
    Expression::Parenthesized(ParenthesizedExpression {
        expression: Box::new(expression),
        span: SPAN,
    })
}

// ============================================================================
// Aggregates
// ============================================================================

pub fn array(elements: Vec<Expression>) -> Expression {
    Expression::Array(ArrayExpression {
        elements: elements.into_iter().map(|e| Some(ArrayElement::Expression(e))).collect(),
        span: SPAN,
    })
}

/// Object literal from `(key, value)` pairs
pub fn object(properties: Vec<(&str, Expression)>) -> Expression {
    Expression::Object(ObjectExpression {
        properties: properties
            .into_iter()
            .map(|(key, value)| {
                ObjectProperty::Property(Property {
                    key: PropertyKey::Identifier(id(key)),
                    value,
                    span: SPAN,
                })
            })
            .collect(),
        span: SPAN,
    })
}

// ============================================================================
// Functions
// ============================================================================

pub fn parameter(pattern: impl Into<Pattern>) -> Parameter {
    Parameter {
        pattern: pattern.into(),
        default_value: None,
        span: SPAN,
    }
}

pub fn arrow(params: Vec<Parameter>, body: Expression) -> Expression {
    Expression::Arrow(ArrowFunction {
        params,
        body: ArrowBody::Expression(Box::new(body)),
        is_async: false,
        metadata: FunctionMetadata::default(),
        span: SPAN,
    })
}

pub fn arrow_block(params: Vec<Parameter>, body: BlockStatement) -> Expression {
    Expression::Arrow(ArrowFunction {
        params,
        body: ArrowBody::Block(body),
        is_async: false,
        metadata: FunctionMetadata::default(),
        span: SPAN,
    })
}

pub fn function_expr(params: Vec<Parameter>, body: BlockStatement) -> Expression {
    Expression::Function(FunctionExpression {
        name: None,
        params,
        body,
        is_async: false,
        metadata: FunctionMetadata::default(),
        span: SPAN,
    })
}

/// Defer evaluation of `expr`.
///
/// A zero-argument call of a plain callee is already a deferred form of
/// itself, so `foo()` becomes `foo` rather than `() => foo()`.
pub fn thunk(expr: Expression) -> Expression {
    match expr {
        Expression::Call(call)
            if call.arguments.is_empty()
                && !matches!(*call.callee, Expression::Member(_) | Expression::Index(_) | Expression::Call(_)) =>
        {
            *call.callee
        }
        expr => arrow(vec![], expr),
    }
}

// ============================================================================
// Patterns
// ============================================================================

pub fn object_pattern(properties: Vec<ObjectPatternProperty>, rest: Option<Identifier>) -> Pattern {
    Pattern::Object(ObjectPattern {
        properties,
        rest,
        span: SPAN,
    })
}

/// `key: value = default` inside an object pattern
pub fn prop_pattern(key: &str, value: impl Into<Pattern>, default: Option<Expression>) -> ObjectPatternProperty {
    ObjectPatternProperty {
        key: PropertyKey::Identifier(id(key)),
        value: value.into(),
        default,
        span: SPAN,
    }
}

pub fn array_pattern(elements: Vec<Option<PatternElement>>, rest: Option<Pattern>) -> Pattern {
    Pattern::Array(ArrayPattern {
        elements,
        rest: rest.map(Box::new),
        span: SPAN,
    })
}

pub fn element(pattern: impl Into<Pattern>, default: Option<Expression>) -> PatternElement {
    PatternElement {
        pattern: pattern.into(),
        default,
        span: SPAN,
    }
}

// ============================================================================
// Statements
// ============================================================================

pub fn declarator(pattern: impl Into<Pattern>, initializer: Option<Expression>) -> VariableDeclarator {
    VariableDeclarator {
        pattern: pattern.into(),
        initializer,
        span: SPAN,
    }
}

pub fn declaration(kind: VariableKind, declarations: Vec<VariableDeclarator>) -> Statement {
    Statement::VariableDecl(VariableDecl {
        kind,
        declarations,
        span: SPAN,
    })
}

pub fn let_decl(pattern: impl Into<Pattern>, initializer: Option<Expression>) -> Statement {
    declaration(VariableKind::Let, vec![declarator(pattern, initializer)])
}

pub fn const_decl(pattern: impl Into<Pattern>, initializer: Option<Expression>) -> Statement {
    declaration(VariableKind::Const, vec![declarator(pattern, initializer)])
}

pub fn var_decl(pattern: impl Into<Pattern>, initializer: Option<Expression>) -> Statement {
    declaration(VariableKind::Var, vec![declarator(pattern, initializer)])
}

pub fn function_decl(name: &str, params: Vec<Parameter>, body: BlockStatement) -> Statement {
    Statement::FunctionDecl(FunctionDecl {
        name: id(name),
        params,
        body,
        is_async: false,
        metadata: FunctionMetadata::default(),
        span: SPAN,
    })
}

pub fn block(statements: Vec<Statement>) -> BlockStatement {
    BlockStatement::new(statements, SPAN)
}

pub fn block_stmt(statements: Vec<Statement>) -> Statement {
    Statement::Block(block(statements))
}

pub fn expr_stmt(expression: Expression) -> Statement {
    Statement::Expression(ExpressionStatement {
        expression,
        span: SPAN,
    })
}

pub fn return_stmt(value: Option<Expression>) -> Statement {
    Statement::Return(ReturnStatement { value, span: SPAN })
}

pub fn if_stmt(condition: Expression, then_branch: Statement, else_branch: Option<Statement>) -> Statement {
    Statement::If(IfStatement {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
        span: SPAN,
    })
}

/// `export <declaration>`
pub fn export(declaration: Statement) -> Statement {
    Statement::ExportNamed(ExportNamedDecl {
        declaration: Some(Box::new(declaration)),
        specifiers: Vec::new(),
        span: SPAN,
    })
}

/// `export { local as exported, ... }`
pub fn export_list(specifiers: Vec<(&str, &str)>) -> Statement {
    Statement::ExportNamed(ExportNamedDecl {
        declaration: None,
        specifiers: specifiers
            .into_iter()
            .map(|(local, exported)| ExportSpecifier {
                local: id(local),
                exported: id(exported),
                span: SPAN,
            })
            .collect(),
        span: SPAN,
    })
}

pub fn empty() -> Statement {
    Statement::Empty(SPAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_splits_dotted_path() {
        let expr = call("$.state.frozen", vec![number(1.0)]);
        assert_eq!(expr.pretty_print(), "$.state.frozen(1)");
    }

    #[test]
    fn test_thunk_unwraps_plain_zero_argument_call() {
        assert_eq!(thunk(call("compute", vec![])).pretty_print(), "compute");
    }

    #[test]
    fn test_thunk_wraps_everything_else() {
        assert_eq!(thunk(call("compute", vec![id_expr("x")])).pretty_print(), "() => compute(x)");
        assert_eq!(thunk(call("obj.compute", vec![])).pretty_print(), "() => obj.compute()");
        assert_eq!(thunk(id_expr("x")).pretty_print(), "() => x");
    }
}
