//! AST fold for rewriting the syntax tree
//!
//! A fold consumes a node and returns its replacement. Each `fold_*` method
//! has a default implementation that calls the corresponding `walk_*`
//! function, which folds the children and rebuilds the node unchanged in
//! shape. A fold that overrides nothing is the identity.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinder_compiler::ast::*;
//!
//! struct RenameFoo;
//!
//! impl Fold for RenameFoo {
//!     type Error = std::convert::Infallible;
//!
//!     fn fold_expression(&mut self, expr: Expression) -> Result<Expression, Self::Error> {
//!         match expr {
//!             Expression::Identifier(id) if id.name == "foo" => {
//!                 Ok(Expression::Identifier(Identifier::new("bar", id.span)))
//!             }
//!             other => walk_expression(self, other),
//!         }
//!     }
//! }
//! ```

use super::*;

/// AST fold trait
pub trait Fold: Sized {
    /// Error that aborts the fold
    type Error;

    fn fold_statements(&mut self, stmts: Vec<Statement>) -> Result<Vec<Statement>, Self::Error> {
        stmts.into_iter().map(|s| self.fold_statement(s)).collect()
    }

    fn fold_statement(&mut self, stmt: Statement) -> Result<Statement, Self::Error> {
        walk_statement(self, stmt)
    }

    /// Variable declarations may lower to any statement (including `Empty`)
    fn fold_variable_decl(&mut self, decl: VariableDecl) -> Result<Statement, Self::Error> {
        walk_variable_decl(self, decl).map(Statement::VariableDecl)
    }

    fn fold_variable_declarator(
        &mut self,
        declarator: VariableDeclarator,
    ) -> Result<VariableDeclarator, Self::Error> {
        walk_variable_declarator(self, declarator)
    }

    fn fold_function_decl(&mut self, func: FunctionDecl) -> Result<FunctionDecl, Self::Error> {
        walk_function_decl(self, func)
    }

    /// Exports may lower to any statement
    fn fold_export_named(&mut self, export: ExportNamedDecl) -> Result<Statement, Self::Error> {
        walk_export_named(self, export).map(Statement::ExportNamed)
    }

    fn fold_block(&mut self, block: BlockStatement) -> Result<BlockStatement, Self::Error> {
        walk_block(self, block)
    }

    fn fold_expression(&mut self, expr: Expression) -> Result<Expression, Self::Error> {
        walk_expression(self, expr)
    }

    fn fold_arrow_function(&mut self, func: ArrowFunction) -> Result<ArrowFunction, Self::Error> {
        walk_arrow_function(self, func)
    }

    fn fold_function_expression(
        &mut self,
        func: FunctionExpression,
    ) -> Result<FunctionExpression, Self::Error> {
        walk_function_expression(self, func)
    }

    fn fold_parameter(&mut self, param: Parameter) -> Result<Parameter, Self::Error> {
        walk_parameter(self, param)
    }

    fn fold_pattern(&mut self, pattern: Pattern) -> Result<Pattern, Self::Error> {
        walk_pattern(self, pattern)
    }
}

// ============================================================================
// Walk functions
// ============================================================================

fn fold_boxed<F: Fold>(folder: &mut F, expr: Box<Expression>) -> Result<Box<Expression>, F::Error> {
    folder.fold_expression(*expr).map(Box::new)
}

fn fold_optional<F: Fold>(
    folder: &mut F,
    expr: Option<Expression>,
) -> Result<Option<Expression>, F::Error> {
    expr.map(|e| folder.fold_expression(e)).transpose()
}

pub fn walk_statement<F: Fold>(folder: &mut F, stmt: Statement) -> Result<Statement, F::Error> {
    Ok(match stmt {
        Statement::VariableDecl(decl) => return folder.fold_variable_decl(decl),
        Statement::ExportNamed(export) => return folder.fold_export_named(export),
        Statement::FunctionDecl(func) => Statement::FunctionDecl(folder.fold_function_decl(func)?),
        Statement::Expression(stmt) => Statement::Expression(ExpressionStatement {
            expression: folder.fold_expression(stmt.expression)?,
            span: stmt.span,
        }),
        Statement::Return(ret) => Statement::Return(ReturnStatement {
            value: fold_optional(folder, ret.value)?,
            span: ret.span,
        }),
        Statement::If(if_stmt) => {
            let condition = folder.fold_expression(if_stmt.condition)?;
            let then_branch = Box::new(folder.fold_statement(*if_stmt.then_branch)?);
            let else_branch = match if_stmt.else_branch {
                Some(branch) => Some(Box::new(folder.fold_statement(*branch)?)),
                None => None,
            };
            Statement::If(IfStatement {
                condition,
                then_branch,
                else_branch,
                span: if_stmt.span,
            })
        }
        Statement::Block(block) => Statement::Block(folder.fold_block(block)?),
        Statement::Empty(span) => Statement::Empty(span),
    })
}

pub fn walk_variable_decl<F: Fold>(folder: &mut F, decl: VariableDecl) -> Result<VariableDecl, F::Error> {
    let declarations = decl
        .declarations
        .into_iter()
        .map(|d| folder.fold_variable_declarator(d))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VariableDecl {
        kind: decl.kind,
        declarations,
        span: decl.span,
    })
}

pub fn walk_variable_declarator<F: Fold>(
    folder: &mut F,
    declarator: VariableDeclarator,
) -> Result<VariableDeclarator, F::Error> {
    Ok(VariableDeclarator {
        pattern: folder.fold_pattern(declarator.pattern)?,
        initializer: fold_optional(folder, declarator.initializer)?,
        span: declarator.span,
    })
}

pub fn walk_function_decl<F: Fold>(folder: &mut F, func: FunctionDecl) -> Result<FunctionDecl, F::Error> {
    let params = func
        .params
        .into_iter()
        .map(|p| folder.fold_parameter(p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FunctionDecl {
        name: func.name,
        params,
        body: folder.fold_block(func.body)?,
        is_async: func.is_async,
        metadata: func.metadata,
        span: func.span,
    })
}

pub fn walk_export_named<F: Fold>(
    folder: &mut F,
    export: ExportNamedDecl,
) -> Result<ExportNamedDecl, F::Error> {
    let declaration = match export.declaration {
        Some(decl) => Some(Box::new(folder.fold_statement(*decl)?)),
        None => None,
    };
    Ok(ExportNamedDecl {
        declaration,
        specifiers: export.specifiers,
        span: export.span,
    })
}

pub fn walk_block<F: Fold>(folder: &mut F, block: BlockStatement) -> Result<BlockStatement, F::Error> {
    Ok(BlockStatement {
        statements: folder.fold_statements(block.statements)?,
        scope: block.scope,
        span: block.span,
    })
}

pub fn walk_parameter<F: Fold>(folder: &mut F, param: Parameter) -> Result<Parameter, F::Error> {
    Ok(Parameter {
        pattern: folder.fold_pattern(param.pattern)?,
        default_value: fold_optional(folder, param.default_value)?,
        span: param.span,
    })
}

pub fn walk_arrow_function<F: Fold>(folder: &mut F, func: ArrowFunction) -> Result<ArrowFunction, F::Error> {
    let params = func
        .params
        .into_iter()
        .map(|p| folder.fold_parameter(p))
        .collect::<Result<Vec<_>, _>>()?;
    let body = match func.body {
        ArrowBody::Expression(expr) => ArrowBody::Expression(fold_boxed(folder, expr)?),
        ArrowBody::Block(block) => ArrowBody::Block(folder.fold_block(block)?),
    };
    Ok(ArrowFunction {
        params,
        body,
        is_async: func.is_async,
        metadata: func.metadata,
        span: func.span,
    })
}

pub fn walk_function_expression<F: Fold>(
    folder: &mut F,
    func: FunctionExpression,
) -> Result<FunctionExpression, F::Error> {
    let params = func
        .params
        .into_iter()
        .map(|p| folder.fold_parameter(p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FunctionExpression {
        name: func.name,
        params,
        body: folder.fold_block(func.body)?,
        is_async: func.is_async,
        metadata: func.metadata,
        span: func.span,
    })
}

pub fn walk_pattern<F: Fold>(folder: &mut F, pattern: Pattern) -> Result<Pattern, F::Error> {
    Ok(match pattern {
        Pattern::Identifier(id) => Pattern::Identifier(id),
        Pattern::Array(array) => {
            let mut elements = Vec::with_capacity(array.elements.len());
            for element in array.elements {
                elements.push(match element {
                    Some(element) => Some(PatternElement {
                        pattern: folder.fold_pattern(element.pattern)?,
                        default: fold_optional(folder, element.default)?,
                        span: element.span,
                    }),
                    None => None,
                });
            }
            let rest = match array.rest {
                Some(rest) => Some(Box::new(folder.fold_pattern(*rest)?)),
                None => None,
            };
            Pattern::Array(ArrayPattern {
                elements,
                rest,
                span: array.span,
            })
        }
        Pattern::Object(object) => {
            let mut properties = Vec::with_capacity(object.properties.len());
            for property in object.properties {
                properties.push(ObjectPatternProperty {
                    key: walk_property_key(folder, property.key)?,
                    value: folder.fold_pattern(property.value)?,
                    default: fold_optional(folder, property.default)?,
                    span: property.span,
                });
            }
            Pattern::Object(ObjectPattern {
                properties,
                rest: object.rest,
                span: object.span,
            })
        }
    })
}

fn walk_property_key<F: Fold>(folder: &mut F, key: PropertyKey) -> Result<PropertyKey, F::Error> {
    Ok(match key {
        PropertyKey::Computed(expr) => PropertyKey::Computed(folder.fold_expression(expr)?),
        other => other,
    })
}

pub fn walk_expression<F: Fold>(folder: &mut F, expr: Expression) -> Result<Expression, F::Error> {
    Ok(match expr {
        Expression::NumberLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::Identifier(_)
        | Expression::This(_) => expr,
        Expression::TemplateLiteral(template) => {
            let expressions = template
                .expressions
                .into_iter()
                .map(|e| folder.fold_expression(e))
                .collect::<Result<Vec<_>, _>>()?;
            Expression::TemplateLiteral(TemplateLiteral {
                quasis: template.quasis,
                expressions,
                span: template.span,
            })
        }
        Expression::Array(array) => {
            let mut elements = Vec::with_capacity(array.elements.len());
            for element in array.elements {
                elements.push(match element {
                    Some(ArrayElement::Expression(e)) => {
                        Some(ArrayElement::Expression(folder.fold_expression(e)?))
                    }
                    Some(ArrayElement::Spread(e)) => Some(ArrayElement::Spread(folder.fold_expression(e)?)),
                    None => None,
                });
            }
            Expression::Array(ArrayExpression {
                elements,
                span: array.span,
            })
        }
        Expression::Object(object) => {
            let mut properties = Vec::with_capacity(object.properties.len());
            for property in object.properties {
                properties.push(match property {
                    ObjectProperty::Property(p) => ObjectProperty::Property(Property {
                        key: walk_property_key(folder, p.key)?,
                        value: folder.fold_expression(p.value)?,
                        span: p.span,
                    }),
                    ObjectProperty::Spread(s) => ObjectProperty::Spread(SpreadProperty {
                        argument: folder.fold_expression(s.argument)?,
                        span: s.span,
                    }),
                });
            }
            Expression::Object(ObjectExpression {
                properties,
                span: object.span,
            })
        }
        Expression::Unary(unary) => Expression::Unary(UnaryExpression {
            operator: unary.operator,
            operand: fold_boxed(folder, unary.operand)?,
            span: unary.span,
        }),
        Expression::Binary(binary) => Expression::Binary(BinaryExpression {
            operator: binary.operator,
            left: fold_boxed(folder, binary.left)?,
            right: fold_boxed(folder, binary.right)?,
            span: binary.span,
        }),
        Expression::Logical(logical) => Expression::Logical(LogicalExpression {
            operator: logical.operator,
            left: fold_boxed(folder, logical.left)?,
            right: fold_boxed(folder, logical.right)?,
            span: logical.span,
        }),
        Expression::Assignment(assign) => Expression::Assignment(AssignmentExpression {
            operator: assign.operator,
            left: fold_boxed(folder, assign.left)?,
            right: fold_boxed(folder, assign.right)?,
            span: assign.span,
        }),
        Expression::Conditional(cond) => Expression::Conditional(ConditionalExpression {
            test: fold_boxed(folder, cond.test)?,
            consequent: fold_boxed(folder, cond.consequent)?,
            alternate: fold_boxed(folder, cond.alternate)?,
            span: cond.span,
        }),
        Expression::Call(call) => {
            let callee = fold_boxed(folder, call.callee)?;
            let arguments = call
                .arguments
                .into_iter()
                .map(|a| folder.fold_expression(a))
                .collect::<Result<Vec<_>, _>>()?;
            Expression::Call(CallExpression {
                callee,
                arguments,
                span: call.span,
            })
        }
        Expression::Member(member) => Expression::Member(MemberExpression {
            object: fold_boxed(folder, member.object)?,
            property: member.property,
            optional: member.optional,
            span: member.span,
        }),
        Expression::Index(index) => Expression::Index(IndexExpression {
            object: fold_boxed(folder, index.object)?,
            index: fold_boxed(folder, index.index)?,
            span: index.span,
        }),
        Expression::Arrow(func) => Expression::Arrow(folder.fold_arrow_function(func)?),
        Expression::Function(func) => Expression::Function(folder.fold_function_expression(func)?),
        Expression::Sequence(seq) => {
            let expressions = seq
                .expressions
                .into_iter()
                .map(|e| folder.fold_expression(e))
                .collect::<Result<Vec<_>, _>>()?;
            Expression::Sequence(SequenceExpression {
                expressions,
                span: seq.span,
            })
        }
        Expression::Parenthesized(paren) => Expression::Parenthesized(ParenthesizedExpression {
            expression: fold_boxed(folder, paren.expression)?,
            span: paren.span,
        }),
    })
}
