//! Binary operation, assignment, and compound-assignment rules
//!
//! Pointer arithmetic is rewritten here: the integer operand of a
//! pointer +/- is multiplied by the pointer base size, with integral
//! promotion applied before the multiplication.

use super::super::{TypeChecker, TypeError};
use crate::ast::{BinaryOp, Expression, ExpressionKind};
use crate::types::Type;
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    pub(crate) fn check_binary(
        &mut self,
        op: BinaryOp,
        span: &SourceSpan,
        left: &mut Expression,
        right: &mut Expression,
    ) -> Option<Type> {
        match op {
            BinaryOp::Add | BinaryOp::Sub => {
                self.expects_same_integer_or_pointer_diff(op, span, left, right)
            }
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::LeftShift
            | BinaryOp::RightShift => self.expects_same_integer(op, left, right),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Less
            | BinaryOp::Greater
            | BinaryOp::LessEqual
            | BinaryOp::GreaterEqual
            | BinaryOp::LogicalAnd
            | BinaryOp::LogicalOr => self.expects_comparable_scalars(op, left, right),
        }
    }

    /// `+`/`-`: pointer ± integer scales the integer operand; two integers
    /// fall through to the arithmetic rule. `integer - pointer` is
    /// rejected outright.
    fn expects_same_integer_or_pointer_diff(
        &mut self,
        op: BinaryOp,
        span: &SourceSpan,
        left: &mut Expression,
        right: &mut Expression,
    ) -> Option<Type> {
        let lt = left.ty().cloned()?;
        let rt = right.ty().cloned()?;

        if lt.is_dereferable() {
            if lt.base_type().map(Type::is_void).unwrap_or(true) {
                self.wrong_type_error(left, &op.to_string());
                return Some(lt);
            }
            if !self.must_be_integer(right, &op.to_string()) {
                return Some(lt);
            }
            let ptr: &Expression = left;
            right.replace_with(|old| self.multiply_ptr_base_size(old, ptr));
            return Some(lt);
        }

        if rt.is_dereferable() {
            if op == BinaryOp::Sub {
                self.error(span, TypeError::IntegerPointerOperation);
                return Some(lt);
            }
            if rt.base_type().map(Type::is_void).unwrap_or(true) {
                self.wrong_type_error(right, &op.to_string());
                return Some(lt);
            }
            if !self.must_be_integer(left, &op.to_string()) {
                return Some(lt);
            }
            let ptr: &Expression = right;
            left.replace_with(|old| self.multiply_ptr_base_size(old, ptr));
            return Some(rt);
        }

        self.expects_same_integer(op, left, right)
    }

    /// `*`, `/`, `%`, `&`, `|`, `^`, `<<`, `>>`: both sides integer, then
    /// the usual arithmetic conversion.
    fn expects_same_integer(
        &mut self,
        op: BinaryOp,
        left: &mut Expression,
        right: &mut Expression,
    ) -> Option<Type> {
        if !self.must_be_integer(left, &op.to_string()) {
            return left.expr_type.clone();
        }
        if !self.must_be_integer(right, &op.to_string()) {
            return left.expr_type.clone();
        }
        self.arithmetic_implicit_cast(left, right)
    }

    /// Comparisons and logical operators: both sides scalar. A dereferable
    /// side forces the other side to its pointer type; otherwise the usual
    /// arithmetic conversion applies.
    fn expects_comparable_scalars(
        &mut self,
        op: BinaryOp,
        left: &mut Expression,
        right: &mut Expression,
    ) -> Option<Type> {
        if !self.must_be_scalar(left, &op.to_string()) {
            return left.expr_type.clone();
        }
        if !self.must_be_scalar(right, &op.to_string()) {
            return left.expr_type.clone();
        }
        let lt = left.ty().cloned()?;
        let rt = right.ty().cloned()?;
        if lt.is_dereferable() {
            self.force_pointer_type(&lt, right);
            return Some(lt);
        }
        if rt.is_dereferable() {
            self.force_pointer_type(&rt, left);
            return Some(rt);
        }
        self.arithmetic_implicit_cast(left, right)
    }

    /// Cast the slave side to the master's pointer type, warning when the
    /// types are not compatible.
    fn force_pointer_type(&mut self, master_type: &Type, slave: &mut Expression) {
        let Some(slave_type) = slave.ty().cloned() else {
            return;
        };
        if master_type.is_compatible(&slave_type) {
            return;
        }
        self.warn(
            &slave.span,
            TypeError::IncompatibleImplicitCast {
                from: slave_type,
                to: master_type.clone(),
            },
        );
        let target = master_type.clone();
        slave.replace_with(|old| Expression::cast(target, old));
    }

    /// Usual arithmetic conversion over a binary node: promote both sides,
    /// compute the common type, and cast each side whose promoted type
    /// differs from it.
    fn arithmetic_implicit_cast(
        &mut self,
        left: &mut Expression,
        right: &mut Expression,
    ) -> Option<Type> {
        let lt = left.ty().cloned()?;
        let rt = right.ty().cloned()?;
        let l = self.integral_promotion(&lt);
        let r = self.integral_promotion(&rt);
        let target = self.usual_arithmetic_conversion(&l, &r);
        if l != target {
            let target = target.clone();
            left.replace_with(|old| Expression::cast(target, old));
        }
        if r != target {
            let target = target.clone();
            right.replace_with(|old| Expression::cast(target, old));
        }
        Some(target)
    }

    /// `L = R`: validate both sides, then cast the RHS to the LHS type.
    pub(crate) fn check_assign(
        &mut self,
        lhs: &mut Expression,
        rhs: &mut Expression,
    ) -> Option<Type> {
        if !self.check_lhs(lhs) {
            return lhs.expr_type.clone();
        }
        if !self.check_rhs(rhs) {
            return lhs.expr_type.clone();
        }
        let lhs_type = lhs.ty().cloned()?;
        let target = lhs_type.clone();
        rhs.replace_with(|old| self.implicit_cast(&target, old));
        Some(lhs_type)
    }

    /// `L ⊙= R`: pointer-arithmetic regime for `+=`/`-=` on a dereferable
    /// LHS, integer-arithmetic regime otherwise. The node keeps the LHS
    /// type; only the RHS is cast to the computation type.
    pub(crate) fn check_op_assign(
        &mut self,
        op: BinaryOp,
        span: &SourceSpan,
        lhs: &mut Expression,
        rhs: &mut Expression,
    ) -> Option<Type> {
        if !self.check_lhs(lhs) {
            return lhs.expr_type.clone();
        }
        if !self.check_rhs(rhs) {
            return lhs.expr_type.clone();
        }
        let lhs_type = lhs.ty().cloned()?;

        if matches!(op, BinaryOp::Add | BinaryOp::Sub) && lhs_type.is_dereferable() {
            if !self.must_be_integer(rhs, &op.to_string()) {
                return Some(lhs_type);
            }
            let ptr: &Expression = lhs;
            rhs.replace_with(|old| self.multiply_ptr_base_size(old, ptr));
            return Some(lhs_type);
        }

        if !self.must_be_integer(lhs, &op.to_string()) {
            return Some(lhs_type);
        }
        if !self.must_be_integer(rhs, &op.to_string()) {
            return Some(lhs_type);
        }
        let l = self.integral_promotion(&lhs_type);
        let r = self.integral_promotion(&rhs.ty().cloned()?);
        let op_type = self.usual_arithmetic_conversion(&l, &r);
        if !op_type.is_compatible(&l) && !self.is_safe_integer_cast(rhs, &l) {
            self.warn(
                span,
                TypeError::IncompatibleImplicitCast {
                    from: op_type.clone(),
                    to: lhs_type.clone(),
                },
            );
        }
        if r != op_type {
            rhs.replace_with(|old| Expression::cast(op_type, old));
        }
        Some(lhs_type)
    }

    /// `expr * sizeof(*ptr)` with integral promotion applied to `expr`
    /// first. The scaling literal is typed as ptrdiff at creation and
    /// carries the pointer operand's location.
    pub(crate) fn multiply_ptr_base_size(
        &mut self,
        expr: Expression,
        ptr: &Expression,
    ) -> Expression {
        let base_size = match ptr.ty().and_then(Type::base_type).and_then(Type::size) {
            Some(size) => size,
            None => panic!("must not happen: unsized pointer base in {:?}", ptr.ty()),
        };
        let size_literal = Expression::with_type(
            ExpressionKind::IntLiteral(base_size as i64),
            ptr.span.clone(),
            self.types().ptr_diff_type(),
        );
        let promoted = self.integral_promoted_expr(expr);
        let result_type = promoted.expr_type.clone();
        let span = promoted.span.extend(&size_literal.span);
        Expression {
            kind: ExpressionKind::Binary {
                op: BinaryOp::Mul,
                left: Box::new(promoted),
                right: Box::new(size_literal),
            },
            span,
            expr_type: result_type,
        }
    }
}
