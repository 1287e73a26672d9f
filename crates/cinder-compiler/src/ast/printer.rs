//! Pretty-printing for the AST
//!
//! Renders nodes back to JavaScript source. Output is deterministic: tabs for
//! indentation, single-quoted strings, and parentheses only where operator
//! precedence requires them.

use super::*;

/// Trait for rendering AST nodes as source text
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Statement {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.statement(self);
        printer.out
    }
}

impl PrettyPrint for [Statement] {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        for (i, stmt) in self.iter().enumerate() {
            if i > 0 {
                printer.out.push('\n');
            }
            printer.statement(stmt);
        }
        printer.out
    }
}

impl PrettyPrint for Script {
    fn pretty_print(&self) -> String {
        self.statements.pretty_print()
    }
}

impl PrettyPrint for Expression {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.expression(self, 0);
        printer.out
    }
}

impl PrettyPrint for Pattern {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.pattern(self);
        printer.out
    }
}

impl PrettyPrint for VariableDeclarator {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.declarator(self);
        printer.out
    }
}

// Binding power of each expression form; higher binds tighter.
const PREC_SEQUENCE: u8 = 1;
const PREC_ASSIGN: u8 = 2;
const PREC_CONDITIONAL: u8 = 3;
const PREC_PREFIX: u8 = 16;
const PREC_POSTFIX: u8 = 17;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

fn logical_precedence(op: LogicalOperator) -> u8 {
    match op {
        LogicalOperator::NullishCoalescing => 4,
        LogicalOperator::Or => 5,
        LogicalOperator::And => 6,
    }
}

fn binary_precedence(op: BinaryOperator) -> u8 {
    use BinaryOperator::*;
    match op {
        BitwiseOr => 7,
        BitwiseXor => 8,
        BitwiseAnd => 9,
        Equal | NotEqual | StrictEqual | StrictNotEqual => 10,
        LessThan | LessEqual | GreaterThan | GreaterEqual => 11,
        LeftShift | RightShift | UnsignedRightShift => 12,
        Add | Subtract => 13,
        Multiply | Divide | Modulo => 14,
        Exponent => 15,
    }
}

fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::Sequence(_) => PREC_SEQUENCE,
        Expression::Assignment(_) | Expression::Arrow(_) => PREC_ASSIGN,
        Expression::Conditional(_) => PREC_CONDITIONAL,
        Expression::Logical(e) => logical_precedence(e.operator),
        Expression::Binary(e) => binary_precedence(e.operator),
        Expression::Unary(e) if e.operator.is_postfix() => PREC_POSTFIX,
        Expression::Unary(_) => PREC_PREFIX,
        Expression::NumberLiteral(n) if n.value < 0.0 => PREC_PREFIX,
        Expression::Call(_) | Expression::Member(_) | Expression::Index(_) => PREC_CALL,
        _ => PREC_PRIMARY,
    }
}

/// Whether the leftmost token of `expr` would be read as a block or a
/// function declaration at statement start
fn starts_ambiguously(expr: &Expression) -> bool {
    match expr {
        Expression::Object(_) | Expression::Function(_) => true,
        Expression::Member(e) => starts_ambiguously(&e.object),
        Expression::Index(e) => starts_ambiguously(&e.object),
        Expression::Call(e) => starts_ambiguously(&e.callee),
        Expression::Binary(e) => starts_ambiguously(&e.left),
        Expression::Logical(e) => starts_ambiguously(&e.left),
        Expression::Assignment(e) => starts_ambiguously(&e.left),
        Expression::Conditional(e) => starts_ambiguously(&e.test),
        Expression::Unary(e) if e.operator.is_postfix() => starts_ambiguously(&e.operand),
        Expression::Sequence(e) => e.expressions.first().is_some_and(starts_ambiguously),
        _ => false,
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VariableDecl(decl) => {
                self.variable_decl(decl);
                self.out.push(';');
            }
            Statement::FunctionDecl(func) => {
                if func.is_async {
                    self.out.push_str("async ");
                }
                self.out.push_str("function ");
                self.out.push_str(&func.name.name);
                self.params(&func.params);
                self.out.push(' ');
                self.block(&func.body);
            }
            Statement::Expression(stmt) => {
                if starts_ambiguously(&stmt.expression) {
                    self.out.push('(');
                    self.expression(&stmt.expression, 0);
                    self.out.push(')');
                } else {
                    self.expression(&stmt.expression, 0);
                }
                self.out.push(';');
            }
            Statement::Return(ret) => {
                self.out.push_str("return");
                if let Some(value) = &ret.value {
                    self.out.push(' ');
                    self.expression(value, 0);
                }
                self.out.push(';');
            }
            Statement::If(if_stmt) => {
                self.out.push_str("if (");
                self.expression(&if_stmt.condition, 0);
                self.out.push_str(") ");
                self.statement(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.out.push_str(" else ");
                    self.statement(else_branch);
                }
            }
            Statement::Block(block) => self.block(block),
            Statement::ExportNamed(export) => {
                self.out.push_str("export ");
                match &export.declaration {
                    Some(decl) => self.statement(decl),
                    None => {
                        let specifiers: Vec<String> = export
                            .specifiers
                            .iter()
                            .map(|s| {
                                if s.local.name == s.exported.name {
                                    s.local.name.clone()
                                } else {
                                    format!("{} as {}", s.local.name, s.exported.name)
                                }
                            })
                            .collect();
                        if specifiers.is_empty() {
                            self.out.push_str("{};");
                        } else {
                            self.out.push_str("{ ");
                            self.out.push_str(&specifiers.join(", "));
                            self.out.push_str(" };");
                        }
                    }
                }
            }
            Statement::Empty(_) => self.out.push(';'),
        }
    }

    fn variable_decl(&mut self, decl: &VariableDecl) {
        self.out.push_str(decl.kind.as_str());
        self.out.push(' ');
        for (i, declarator) in decl.declarations.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.declarator(declarator);
        }
    }

    fn declarator(&mut self, declarator: &VariableDeclarator) {
        self.pattern(&declarator.pattern);
        if let Some(init) = &declarator.initializer {
            self.out.push_str(" = ");
            self.expression(init, PREC_ASSIGN);
        }
    }

    fn block(&mut self, block: &BlockStatement) {
        if block.statements.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.indent += 1;
        for stmt in &block.statements {
            self.newline();
            self.statement(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.out.push('}');
    }

    fn params(&mut self, params: &[Parameter]) {
        self.out.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.pattern(&param.pattern);
            if let Some(default) = &param.default_value {
                self.out.push_str(" = ");
                self.expression(default, PREC_ASSIGN);
            }
        }
        self.out.push(')');
    }

    // ------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(id) => self.out.push_str(&id.name),
            Pattern::Array(array) => {
                self.out.push('[');
                let count = array.elements.len();
                for (i, element) in array.elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    match element {
                        Some(element) => {
                            self.pattern(&element.pattern);
                            self.default_value(element.default.as_ref());
                        }
                        // a trailing hole needs its own comma
                        None if i + 1 == count && array.rest.is_none() => self.out.push(','),
                        None => {}
                    }
                }
                if let Some(rest) = &array.rest {
                    if count > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str("...");
                    self.pattern(rest);
                }
                self.out.push(']');
            }
            Pattern::Object(object) => {
                if object.properties.is_empty() && object.rest.is_none() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (i, property) in object.properties.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    let shorthand = matches!(
                        (&property.key, &property.value),
                        (PropertyKey::Identifier(key), Pattern::Identifier(value)) if key.name == value.name
                    );
                    if !shorthand {
                        self.property_key(&property.key);
                        self.out.push_str(": ");
                    }
                    self.pattern(&property.value);
                    self.default_value(property.default.as_ref());
                }
                if let Some(rest) = &object.rest {
                    if !object.properties.is_empty() {
                        self.out.push_str(", ");
                    }
                    self.out.push_str("...");
                    self.out.push_str(&rest.name);
                }
                self.out.push_str(" }");
            }
        }
    }

    fn default_value(&mut self, default: Option<&Expression>) {
        if let Some(default) = default {
            self.out.push_str(" = ");
            self.expression(default, PREC_ASSIGN);
        }
    }

    fn property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Identifier(id) => self.out.push_str(&id.name),
            PropertyKey::StringLiteral(s) => self.out.push_str(&quote(&s.value)),
            PropertyKey::NumberLiteral(n) => self.out.push_str(&format_number(n.value)),
            PropertyKey::Computed(expr) => {
                self.out.push('[');
                self.expression(expr, PREC_ASSIGN);
                self.out.push(']');
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Print `expr`, parenthesised when it binds looser than `min`
    fn expression(&mut self, expr: &Expression, min: u8) {
        if precedence(expr) < min {
            self.out.push('(');
            self.expression_inner(expr);
            self.out.push(')');
        } else {
            self.expression_inner(expr);
        }
    }

    fn expression_inner(&mut self, expr: &Expression) {
        match expr {
            Expression::NumberLiteral(n) => self.out.push_str(&format_number(n.value)),
            Expression::StringLiteral(s) => self.out.push_str(&quote(&s.value)),
            Expression::BooleanLiteral(b) => self.out.push_str(if b.value { "true" } else { "false" }),
            Expression::NullLiteral(_) => self.out.push_str("null"),
            Expression::This(_) => self.out.push_str("this"),
            Expression::Identifier(id) => self.out.push_str(&id.name),
            Expression::TemplateLiteral(template) => {
                self.out.push('`');
                for (i, quasi) in template.quasis.iter().enumerate() {
                    self.out.push_str(quasi);
                    if let Some(expr) = template.expressions.get(i) {
                        self.out.push_str("${");
                        self.expression(expr, 0);
                        self.out.push('}');
                    }
                }
                self.out.push('`');
            }
            Expression::Array(array) => {
                self.out.push('[');
                let count = array.elements.len();
                for (i, element) in array.elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    match element {
                        Some(ArrayElement::Expression(e)) => self.expression(e, PREC_ASSIGN),
                        Some(ArrayElement::Spread(e)) => {
                            self.out.push_str("...");
                            self.expression(e, PREC_ASSIGN);
                        }
                        None if i + 1 == count => self.out.push(','),
                        None => {}
                    }
                }
                self.out.push(']');
            }
            Expression::Object(object) => {
                if object.properties.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (i, property) in object.properties.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    match property {
                        ObjectProperty::Property(p) => {
                            let shorthand = matches!(
                                (&p.key, &p.value),
                                (PropertyKey::Identifier(key), Expression::Identifier(value)) if key.name == value.name
                            );
                            if shorthand {
                                self.expression(&p.value, PREC_ASSIGN);
                            } else {
                                self.property_key(&p.key);
                                self.out.push_str(": ");
                                self.expression(&p.value, PREC_ASSIGN);
                            }
                        }
                        ObjectProperty::Spread(s) => {
                            self.out.push_str("...");
                            self.expression(&s.argument, PREC_ASSIGN);
                        }
                    }
                }
                self.out.push_str(" }");
            }
            Expression::Unary(unary) => {
                if unary.operator.is_postfix() {
                    self.expression(&unary.operand, PREC_POSTFIX);
                    self.out.push_str(unary.operator.as_str());
                    return;
                }
                let op = unary.operator.as_str();
                self.out.push_str(op);
                let mut operand = Printer {
                    out: String::new(),
                    indent: self.indent,
                };
                operand.expression(&unary.operand, PREC_PREFIX);
                let needs_space = matches!(unary.operator, UnaryOperator::Typeof | UnaryOperator::Void)
                    || (op.ends_with('-') && operand.out.starts_with('-'))
                    || (op.ends_with('+') && operand.out.starts_with('+'));
                if needs_space {
                    self.out.push(' ');
                }
                self.out.push_str(&operand.out);
            }
            Expression::Binary(binary) => {
                let prec = binary_precedence(binary.operator);
                let (left_min, right_min) = if binary.operator == BinaryOperator::Exponent {
                    (PREC_POSTFIX, prec)
                } else {
                    (prec, prec + 1)
                };
                self.expression(&binary.left, left_min);
                self.out.push(' ');
                self.out.push_str(binary.operator.as_str());
                self.out.push(' ');
                self.expression(&binary.right, right_min);
            }
            Expression::Logical(logical) => {
                let prec = logical_precedence(logical.operator);
                self.logical_operand(&logical.left, logical.operator, prec);
                self.out.push(' ');
                self.out.push_str(logical.operator.as_str());
                self.out.push(' ');
                self.logical_operand(&logical.right, logical.operator, prec + 1);
            }
            Expression::Assignment(assign) => {
                self.expression(&assign.left, PREC_CALL);
                self.out.push(' ');
                self.out.push_str(assign.operator.as_str());
                self.out.push(' ');
                self.expression(&assign.right, PREC_ASSIGN);
            }
            Expression::Conditional(cond) => {
                self.expression(&cond.test, PREC_CONDITIONAL + 1);
                self.out.push_str(" ? ");
                self.expression(&cond.consequent, PREC_ASSIGN);
                self.out.push_str(" : ");
                self.expression(&cond.alternate, PREC_ASSIGN);
            }
            Expression::Call(call) => {
                self.expression(&call.callee, PREC_CALL);
                self.out.push('(');
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expression(arg, PREC_ASSIGN);
                }
                self.out.push(')');
            }
            Expression::Member(member) => {
                self.expression(&member.object, PREC_CALL);
                self.out.push_str(if member.optional { "?." } else { "." });
                self.out.push_str(&member.property.name);
            }
            Expression::Index(index) => {
                self.expression(&index.object, PREC_CALL);
                self.out.push('[');
                self.expression(&index.index, 0);
                self.out.push(']');
            }
            Expression::Arrow(func) => {
                if func.is_async {
                    self.out.push_str("async ");
                }
                self.params(&func.params);
                self.out.push_str(" => ");
                match &func.body {
                    ArrowBody::Expression(body) if matches!(**body, Expression::Object(_)) => {
                        self.out.push('(');
                        self.expression(body, 0);
                        self.out.push(')');
                    }
                    ArrowBody::Expression(body) => self.expression(body, PREC_ASSIGN),
                    ArrowBody::Block(block) => self.block(block),
                }
            }
            Expression::Function(func) => {
                if func.is_async {
                    self.out.push_str("async ");
                }
                self.out.push_str("function");
                if let Some(name) = &func.name {
                    self.out.push(' ');
                    self.out.push_str(&name.name);
                }
                self.params(&func.params);
                self.out.push(' ');
                self.block(&func.body);
            }
            Expression::Sequence(seq) => {
                for (i, expr) in seq.expressions.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expression(expr, PREC_ASSIGN);
                }
            }
            Expression::Parenthesized(paren) => {
                self.out.push('(');
                self.expression(&paren.expression, 0);
                self.out.push(')');
            }
        }
    }

    /// `??` cannot mix with `||` / `&&` without explicit parentheses
    fn logical_operand(&mut self, operand: &Expression, parent: LogicalOperator, min: u8) {
        let mixes_nullish = match operand {
            Expression::Logical(inner) => {
                (parent == LogicalOperator::NullishCoalescing) != (inner.operator == LogicalOperator::NullishCoalescing)
            }
            _ => false,
        };
        if mixes_nullish {
            self.out.push('(');
            self.expression_inner(operand);
            self.out.push(')');
        } else {
            self.expression(operand, min);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders as b;

    #[test]
    fn test_print_declaration() {
        let stmt = b::let_decl(b::id("x"), Some(b::call("$.source", vec![b::number(0.0)])));
        assert_eq!(stmt.pretty_print(), "let x = $.source(0);");
    }

    #[test]
    fn test_print_multiple_declarators() {
        let stmt = b::declaration(
            VariableKind::Const,
            vec![
                b::declarator(b::id("a"), Some(b::number(1.5))),
                b::declarator(b::id("b"), None),
            ],
        );
        assert_eq!(stmt.pretty_print(), "const a = 1.5, b;");
    }

    #[test]
    fn test_print_object_literal_and_shorthand() {
        let expr = b::object(vec![("a", b::number(1.0)), ("b", b::id_expr("b"))]);
        assert_eq!(expr.pretty_print(), "{ a: 1, b }");
        assert_eq!(b::object(vec![]).pretty_print(), "{}");
    }

    #[test]
    fn test_print_patterns() {
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("a", b::id("a"), None),
                b::prop_pattern("b", b::id("c"), Some(b::number(1.0))),
            ],
            Some(b::id("rest")),
        );
        assert_eq!(pattern.pretty_print(), "{ a, b: c = 1, ...rest }");

        let pattern = b::array_pattern(
            vec![
                Some(b::element(b::id("a"), None)),
                None,
                Some(b::element(b::id("b"), Some(b::number(1.0)))),
            ],
            Some(b::id("rest").into()),
        );
        assert_eq!(pattern.pretty_print(), "[a, , b = 1, ...rest]");
    }

    #[test]
    fn test_print_strings_single_quoted() {
        assert_eq!(b::string("it's").pretty_print(), "'it\\'s'");
        assert_eq!(b::array(vec![b::string("$$slots")]).pretty_print(), "['$$slots']");
    }

    #[test]
    fn test_print_arrows() {
        assert_eq!(b::arrow(vec![], b::id_expr("x")).pretty_print(), "() => x");
        assert_eq!(
            b::arrow(vec![], b::object(vec![("a", b::number(1.0))])).pretty_print(),
            "() => ({ a: 1 })"
        );
    }

    #[test]
    fn test_print_block_arrow_indents_with_tabs() {
        let body = b::block(vec![
            b::let_decl(b::id("a"), Some(b::id_expr("b"))),
            b::return_stmt(Some(b::array(vec![b::id_expr("a")]))),
        ]);
        let expr = b::arrow_block(vec![], body);
        assert_eq!(expr.pretty_print(), "() => {\n\tlet a = b;\n\treturn [a];\n}");
    }

    #[test]
    fn test_print_precedence() {
        // (a + b) * c
        let sum = b::binary(BinaryOperator::Add, b::id_expr("a"), b::id_expr("b"));
        let product = b::binary(BinaryOperator::Multiply, sum, b::id_expr("c"));
        assert_eq!(product.pretty_print(), "(a + b) * c");

        // a - (b - c)
        let inner = b::binary(BinaryOperator::Subtract, b::id_expr("b"), b::id_expr("c"));
        let outer = b::binary(BinaryOperator::Subtract, b::id_expr("a"), inner);
        assert_eq!(outer.pretty_print(), "a - (b - c)");

        // (a || b) ?? c
        let or = b::logical(LogicalOperator::Or, b::id_expr("a"), b::id_expr("b"));
        let nullish = b::logical(LogicalOperator::NullishCoalescing, or, b::id_expr("c"));
        assert_eq!(nullish.pretty_print(), "(a || b) ?? c");
    }

    #[test]
    fn test_print_member_on_call_and_index() {
        let expr = b::member_computed(b::call("$.get", vec![b::id_expr("values")]), b::number(0.0));
        assert_eq!(expr.pretty_print(), "$.get(values)[0]");
    }

    #[test]
    fn test_print_unary_spacing() {
        let expr = b::unary(UnaryOperator::Minus, b::unary(UnaryOperator::Minus, b::id_expr("x")));
        assert_eq!(expr.pretty_print(), "- -x");
        let expr = b::unary(UnaryOperator::Typeof, b::id_expr("x"));
        assert_eq!(expr.pretty_print(), "typeof x");
    }

    #[test]
    fn test_print_statement_list_and_empty() {
        let stmts = vec![b::empty(), b::expr_stmt(b::call("foo", vec![]))];
        assert_eq!(stmts.pretty_print(), ";\nfoo();");
    }

    #[test]
    fn test_print_expression_statement_starting_with_object() {
        let stmt = b::expr_stmt(b::assign(b::member(b::object(vec![]), "x"), b::number(1.0)));
        assert_eq!(stmt.pretty_print(), "({}.x = 1);");
    }
}
