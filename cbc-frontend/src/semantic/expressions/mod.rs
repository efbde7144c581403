//! Expression validation and rewriting
//!
//! A post-order walk: children are visited first, so every handler runs
//! with child types in place and child-side cast insertions already done.

mod binary;
mod unary;

use super::{TypeChecker, TypeError};
use crate::ast::{Expression, ExpressionKind};
use crate::types::{pointer_to, Type};
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    pub(crate) fn check_expression(&mut self, expr: &mut Expression) {
        let span = expr.span.clone();
        match &mut expr.kind {
            // Leaf nodes arrive typed from the resolver.
            ExpressionKind::IntLiteral(_)
            | ExpressionKind::StringLiteral(_)
            | ExpressionKind::Variable { .. } => {}

            ExpressionKind::SizeofExpr(operand) => {
                self.check_expression(operand);
                if expr.expr_type.is_none() {
                    expr.expr_type = Some(self.types().unsigned_long());
                }
            }

            ExpressionKind::SizeofType(_) => {
                if expr.expr_type.is_none() {
                    expr.expr_type = Some(self.types().unsigned_long());
                }
            }

            ExpressionKind::Cast {
                target_type,
                operand,
            } => {
                self.check_expression(operand);
                if let Some(from) = operand.ty() {
                    if !from.is_castable_to(target_type) {
                        let err = TypeError::InvalidCast {
                            from: from.clone(),
                            to: target_type.clone(),
                        };
                        self.error(&span, err);
                    }
                }
                expr.expr_type = Some(target_type.clone());
            }

            ExpressionKind::Unary { op, operand } => {
                self.check_expression(operand);
                let op = *op;
                self.check_unary(op, operand);
                expr.expr_type = operand.expr_type.clone();
            }

            ExpressionKind::IncDec {
                op,
                operand,
                op_type,
                amount,
                ..
            } => {
                self.check_expression(operand);
                let op = *op;
                self.expects_scalar_lhs(op, operand, op_type, amount);
                expr.expr_type = operand.expr_type.clone();
            }

            ExpressionKind::Dereference { operand } => {
                self.check_expression(operand);
                if expr.expr_type.is_none() {
                    expr.expr_type = operand.ty().and_then(Type::base_type).cloned();
                }
            }

            ExpressionKind::AddressOf { operand } => {
                self.check_expression(operand);
                if expr.expr_type.is_none() {
                    expr.expr_type = operand.ty().cloned().map(pointer_to);
                }
            }

            ExpressionKind::Member {
                object,
                member,
                is_pointer,
            } => {
                self.check_expression(object);
                if expr.expr_type.is_none() {
                    expr.expr_type = object
                        .ty()
                        .and_then(|t| member_type(t, member, *is_pointer));
                }
            }

            ExpressionKind::ArrayRef { array, index } => {
                self.check_expression(array);
                self.check_expression(index);
                self.must_be_integer(index, "[]");
                if expr.expr_type.is_none() {
                    expr.expr_type = array.ty().and_then(Type::base_type).cloned();
                }
            }

            ExpressionKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                self.check_expression(condition);
                self.check_expression(then_expr);
                self.check_expression(else_expr);
                expr.expr_type = self.check_conditional(condition, then_expr, else_expr);
            }

            ExpressionKind::Binary { op, left, right } => {
                self.check_expression(left);
                self.check_expression(right);
                let op = *op;
                expr.expr_type = self.check_binary(op, &span, left, right);
            }

            ExpressionKind::Assign { lhs, rhs } => {
                self.check_expression(lhs);
                self.check_expression(rhs);
                expr.expr_type = self.check_assign(lhs, rhs);
            }

            ExpressionKind::OpAssign { op, lhs, rhs } => {
                self.check_expression(lhs);
                self.check_expression(rhs);
                let op = *op;
                expr.expr_type = self.check_op_assign(op, &span, lhs, rhs);
            }

            ExpressionKind::Call {
                function,
                arguments,
            } => {
                self.check_expression(function);
                for arg in arguments.iter_mut() {
                    self.check_expression(arg);
                }
                expr.expr_type = self.check_call(&span, function, arguments);
            }
        }
    }

    /// `c ? a : b`: the condition must be scalar; mismatched branch types
    /// are unified by casting the convertible branch to the other's type.
    fn check_conditional(
        &mut self,
        condition: &Expression,
        then_expr: &mut Expression,
        else_expr: &mut Expression,
    ) -> Option<Type> {
        self.must_be_scalar(condition, "condition expression");
        let (Some(t), Some(e)) = (then_expr.ty().cloned(), else_expr.ty().cloned()) else {
            return then_expr.expr_type.clone();
        };
        if t == e {
            Some(t)
        } else if t.is_compatible(&e) {
            then_expr.replace_with(|old| Expression::cast(e.clone(), old));
            Some(e)
        } else if e.is_compatible(&t) {
            else_expr.replace_with(|old| Expression::cast(t.clone(), old));
            Some(t)
        } else {
            // reported at the then branch, else-to-then order (historical)
            let err = TypeError::InvalidCast {
                from: e,
                to: t.clone(),
            };
            let loc = then_expr.span.clone();
            self.error(&loc, err);
            Some(t)
        }
    }

    /// Call checking: arity against the callee signature, then each
    /// mandatory argument is validated as an RHS and cast to its parameter
    /// type; variadic extras pass through unchanged.
    fn check_call(
        &mut self,
        span: &SourceSpan,
        function: &Expression,
        arguments: &mut Vec<Expression>,
    ) -> Option<Type> {
        let func_type = callee_function_type(function.ty()?)?.clone();
        let Type::Function {
            return_type,
            parameters,
            ..
        } = &func_type
        else {
            return None;
        };
        if !func_type.accepts_argc(arguments.len()) {
            self.error(span, TypeError::WrongNumberOfArguments(arguments.len()));
            return Some((**return_type).clone());
        }
        let mut rest = std::mem::take(arguments).into_iter();
        let mut new_args = Vec::with_capacity(rest.len());
        for param in parameters {
            let Some(arg) = rest.next() else { break };
            let arg = if self.check_rhs(&arg) {
                self.implicit_cast(param, arg)
            } else {
                arg
            };
            new_args.push(arg);
        }
        new_args.extend(rest);
        *arguments = new_args;
        Some((**return_type).clone())
    }
}

/// The callee's function type; call expressions go through the function
/// value or a pointer to it.
fn callee_function_type(t: &Type) -> Option<&Type> {
    match t {
        Type::Function { .. } => Some(t),
        Type::Pointer { base } if base.is_function() => Some(base),
        _ => None,
    }
}

/// Field type for member access; the arrow form looks through the pointer.
fn member_type(object_type: &Type, member: &str, is_pointer: bool) -> Option<Type> {
    let aggregate = if is_pointer {
        object_type.base_type()?
    } else {
        object_type
    };
    match aggregate {
        Type::Struct { fields, .. } | Type::Union { fields, .. } => fields
            .iter()
            .find(|f| f.name == member)
            .map(|f| f.field_type.clone()),
        _ => None,
    }
}
