//! Diagnostic message catalogue for the type-checking pass
//!
//! Each variant renders to the canonical diagnostic phrasing. The checker
//! formats these into the error handler rather than propagating them as
//! `Result` errors, so one pass can surface many diagnostics.

use crate::types::Type;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("returns invalid type: {0}")]
    InvalidReturnType(Type),

    #[error("invalid parameter type: {0}")]
    InvalidParameterType(Type),

    #[error("invalid variable type")]
    InvalidVariableType,

    #[error("invalid LHS type: {0}")]
    InvalidLhsType(Type),

    #[error("invalid RHS type: {0}")]
    InvalidRhsType(Type),

    #[error("invalid statement type: {0}")]
    InvalidStatementType(Type),

    #[error("returning value from void function")]
    ReturningValueFromVoidFunction,

    #[error("missing return value")]
    MissingReturnValue,

    #[error("returning void")]
    ReturningVoid,

    /// `op` is an operator token or a phrase such as `condition expression`,
    /// `switch`, or `[]`.
    #[error("wrong operand type for {op}: {operand_type}")]
    WrongOperandType { op: String, operand_type: Type },

    #[error("invalid operation integer-pointer")]
    IntegerPointerOperation,

    // historical spelling, kept verbatim
    #[error("wrong number of argments: {0}")]
    WrongNumberOfArguments(usize),

    #[error("invalid cast from {from} to {to}")]
    InvalidCast { from: Type, to: Type },

    #[error("incompatible implicit cast from {from} to {to}")]
    IncompatibleImplicitCast { from: Type, to: Type },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pointer_to;

    #[test]
    fn test_canonical_messages() {
        assert_eq!(
            TypeError::InvalidReturnType(Type::Struct {
                name: "point".to_string(),
                fields: vec![],
            })
            .to_string(),
            "returns invalid type: struct point"
        );
        assert_eq!(
            TypeError::InvalidVariableType.to_string(),
            "invalid variable type"
        );
        assert_eq!(
            TypeError::InvalidLhsType(Type::Void).to_string(),
            "invalid LHS type: void"
        );
        assert_eq!(
            TypeError::MissingReturnValue.to_string(),
            "missing return value"
        );
        assert_eq!(
            TypeError::WrongOperandType {
                op: "+".to_string(),
                operand_type: pointer_to(Type::Void),
            }
            .to_string(),
            "wrong operand type for +: void*"
        );
        assert_eq!(
            TypeError::WrongOperandType {
                op: "condition expression".to_string(),
                operand_type: Type::Void,
            }
            .to_string(),
            "wrong operand type for condition expression: void"
        );
        assert_eq!(
            TypeError::IntegerPointerOperation.to_string(),
            "invalid operation integer-pointer"
        );
        assert_eq!(
            TypeError::WrongNumberOfArguments(2).to_string(),
            "wrong number of argments: 2"
        );
        assert_eq!(
            TypeError::InvalidCast {
                from: Type::Int,
                to: Type::Void,
            }
            .to_string(),
            "invalid cast from int to void"
        );
        assert_eq!(
            TypeError::IncompatibleImplicitCast {
                from: Type::Int,
                to: Type::Short,
            }
            .to_string(),
            "incompatible implicit cast from int to short"
        );
    }
}
