//! Expression AST nodes for cbc
//!
//! This module defines expression nodes in the abstract syntax tree.
//! Child slots are owned boxes and may be rewritten in place by semantic
//! analysis (cast insertion, pointer-arithmetic scaling, argument
//! replacement).

use super::ops::{BinaryOp, IncDecOp, UnaryOp};
use crate::types::Type;
use cbc_common::SourceSpan;
use serde::{Deserialize, Serialize};

/// AST Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: SourceSpan,
    /// Filled by the resolver for leaf nodes and by the type checker for
    /// everything else.
    pub expr_type: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Integer literal (covers character constants as well)
    IntLiteral(i64),

    /// String literal
    StringLiteral(String),

    /// Resolved variable or function reference
    Variable {
        name: String,
        /// Parameters decay to pointers and are always assignable; several
        /// operand rules depend on this flag.
        is_parameter: bool,
    },

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Unary operation (`+`, `-`, `~`, `!`)
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Prefix or postfix `++`/`--`
    IncDec {
        op: IncDecOp,
        is_prefix: bool,
        operand: Box<Expression>,
        /// Promoted operation type, recorded when integral promotion widens
        /// the operand.
        op_type: Option<Type>,
        /// 1 for integers, pointer base size for pointers.
        amount: i64,
    },

    /// Simple assignment
    Assign {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    /// Compound assignment; `op` is the underlying arithmetic operator
    OpAssign {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    /// Ternary conditional operator
    Conditional {
        condition: Box<Expression>,
        then_expr: Box<Expression>,
        else_expr: Box<Expression>,
    },

    /// Function call
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },

    /// Array subscript
    ArrayRef {
        array: Box<Expression>,
        index: Box<Expression>,
    },

    /// Struct/union member access
    Member {
        object: Box<Expression>,
        member: String,
        /// true for `->`, false for `.`
        is_pointer: bool,
    },

    /// Pointer dereference
    Dereference { operand: Box<Expression> },

    /// Address-of
    AddressOf { operand: Box<Expression> },

    /// Type cast; both written casts and the explicit casts inserted by the
    /// type checker
    Cast {
        target_type: Type,
        operand: Box<Expression>,
    },

    /// Sizeof expression
    SizeofExpr(Box<Expression>),

    /// Sizeof type
    SizeofType(Type),
}

impl Expression {
    /// Create an untyped expression; the resolver or checker fills the type.
    pub fn new(kind: ExpressionKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            expr_type: None,
        }
    }

    /// Create an expression with a known type.
    pub fn with_type(kind: ExpressionKind, span: SourceSpan, expr_type: Type) -> Self {
        Self {
            kind,
            span,
            expr_type: Some(expr_type),
        }
    }

    /// Wrap an expression in a cast node; the cast adopts the operand span
    /// and is typed at creation.
    pub fn cast(target: Type, operand: Expression) -> Self {
        let span = operand.span.clone();
        Self {
            kind: ExpressionKind::Cast {
                target_type: target.clone(),
                operand: Box::new(operand),
            },
            span,
            expr_type: Some(target),
        }
    }

    /// The node's type, if assigned.
    pub fn ty(&self) -> Option<&Type> {
        self.expr_type.as_ref()
    }

    /// True for references to function parameters.
    pub fn is_parameter(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Variable {
                is_parameter: true,
                ..
            }
        )
    }

    /// The literal value, for integer literal nodes.
    pub fn integer_literal_value(&self) -> Option<i64> {
        match self.kind {
            ExpressionKind::IntLiteral(value) => Some(value),
            _ => None,
        }
    }

    /// Rewrite this node in place with a function of its old value.
    ///
    /// The slot stays owned by the parent; `rewrite` consumes the old child
    /// and produces the replacement (typically the old child wrapped in a
    /// cast or scaling node).
    pub fn replace_with(&mut self, rewrite: impl FnOnce(Expression) -> Expression) {
        let placeholder = Expression {
            kind: ExpressionKind::IntLiteral(0),
            span: self.span.clone(),
            expr_type: None,
        };
        let old = std::mem::replace(self, placeholder);
        *self = rewrite(old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbc_common::SourceLocation;

    fn span() -> SourceSpan {
        SourceSpan::from_location(SourceLocation::new_simple(1, 1))
    }

    #[test]
    fn test_expression_creation() {
        let expr = Expression::with_type(ExpressionKind::IntLiteral(42), span(), Type::Int);

        match expr.kind {
            ExpressionKind::IntLiteral(value) => assert_eq!(value, 42),
            _ => panic!("Expected IntLiteral"),
        }
        assert_eq!(expr.expr_type, Some(Type::Int));
        assert_eq!(expr.integer_literal_value(), Some(42));
    }

    #[test]
    fn test_cast_wrapping() {
        let inner = Expression::with_type(ExpressionKind::IntLiteral(0), span(), Type::Int);
        let cast = Expression::cast(Type::Char, inner);

        assert_eq!(cast.expr_type, Some(Type::Char));
        match cast.kind {
            ExpressionKind::Cast {
                target_type,
                operand,
            } => {
                assert_eq!(target_type, Type::Char);
                assert_eq!(operand.expr_type, Some(Type::Int));
            }
            _ => panic!("Expected Cast"),
        }
    }

    #[test]
    fn test_replace_with() {
        let mut expr = Expression::with_type(ExpressionKind::IntLiteral(7), span(), Type::Int);
        expr.replace_with(|old| Expression::cast(Type::Long, old));

        assert_eq!(expr.expr_type, Some(Type::Long));
        match expr.kind {
            ExpressionKind::Cast { operand, .. } => {
                assert_eq!(operand.integer_literal_value(), Some(7));
            }
            _ => panic!("Expected Cast"),
        }
    }
}
