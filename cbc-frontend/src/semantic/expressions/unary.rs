//! Unary and increment/decrement rules

use super::super::TypeChecker;
use crate::ast::{Expression, IncDecOp, UnaryOp};
use crate::types::Type;

impl TypeChecker<'_> {
    /// `+`, `-`, `~` require an integer operand; `!` requires a scalar.
    pub(crate) fn check_unary(&mut self, op: UnaryOp, operand: &Expression) {
        match op {
            UnaryOp::LogicalNot => {
                self.must_be_scalar(operand, &op.to_string());
            }
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => {
                self.must_be_integer(operand, &op.to_string());
            }
        }
    }

    /// `++`/`--` operand admissibility plus the opType/amount annotations.
    ///
    /// Parameters pass unconditionally (array parameters have decayed to
    /// pointers); a non-parameter array cannot be incremented. Integer
    /// operands record their promoted operation type when it widens and
    /// step by 1; dereferable operands step by the base size.
    pub(crate) fn expects_scalar_lhs(
        &mut self,
        op: IncDecOp,
        operand: &Expression,
        op_type: &mut Option<Type>,
        amount: &mut i64,
    ) {
        if operand.is_parameter() {
            // always acceptable
        } else {
            let Some(t) = operand.ty() else { return };
            if t.is_array() {
                self.wrong_type_error(operand, &op.to_string());
                return;
            }
            if !self.must_be_scalar(operand, &op.to_string()) {
                return;
            }
        }

        let Some(t) = operand.ty().cloned() else { return };
        if t.is_integer() {
            let promoted = self.integral_promotion(&t);
            if promoted != t {
                *op_type = Some(promoted);
            }
            *amount = 1;
        } else if t.is_dereferable() {
            let Some(base) = t.base_type() else { return };
            if base.is_void() {
                self.wrong_type_error(operand, &op.to_string());
                return;
            }
            if let Some(size) = base.size() {
                *amount = size as i64;
            }
        }
    }
}
