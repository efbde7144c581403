//! Semantic analysis for cbc
//!
//! The type-checking pass: validates every type-bearing construct, fills
//! the type slot of each expression node, and rewrites the tree so that
//! every implicit conversion is an explicit cast and pointer arithmetic is
//! scaled by the pointer base size. Runs after name/type resolution; the
//! AST is mutated in place.

pub mod errors;

mod conversions;
mod expressions;
mod statements;

pub use errors::TypeError;

use crate::ast::{Declaration, Expression, FunctionDefinition, TopLevelItem, TranslationUnit};
use crate::types::{Type, TypeTable};
use cbc_common::{CompilerError, ErrorHandler, SourceSpan};

/// The type-checking pass
///
/// Borrows the read-only type table and the driver's diagnostic sink for
/// the duration of one traversal.
pub struct TypeChecker<'a> {
    types: &'a TypeTable,
    handler: &'a mut ErrorHandler,
    current_return_type: Option<Type>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(types: &'a TypeTable, handler: &'a mut ErrorHandler) -> Self {
        Self {
            types,
            handler,
            current_return_type: None,
        }
    }

    /// Run the pass over a translation unit.
    ///
    /// Diagnostics are recorded as they are discovered and the traversal
    /// continues past recoverable errors; if any error was recorded the
    /// result is a pass-level semantic failure.
    pub fn check(&mut self, unit: &mut TranslationUnit) -> Result<(), CompilerError> {
        log::debug!("type checking translation unit: {} items", unit.items.len());
        for item in &mut unit.items {
            if let TopLevelItem::Declaration(decl) = item {
                self.check_variable(decl);
            }
        }
        for item in &mut unit.items {
            if let TopLevelItem::Function(func) = item {
                self.check_function(func);
            }
        }
        if self.handler.error_occurred() {
            Err(CompilerError::semantic_error(
                self.handler.summary(),
                unit.span.clone(),
            ))
        } else {
            Ok(())
        }
    }

    fn check_function(&mut self, func: &mut FunctionDefinition) {
        self.check_return_type(func);
        self.check_param_types(func);
        self.current_return_type = Some(func.return_type.clone());
        self.check_block(&mut func.body);
        self.current_return_type = None;
    }

    fn check_return_type(&mut self, func: &FunctionDefinition) {
        if is_invalid_return_type(&func.return_type) {
            self.error(&func.span, TypeError::InvalidReturnType(func.return_type.clone()));
        }
    }

    fn check_param_types(&mut self, func: &FunctionDefinition) {
        for param in &func.parameters {
            if is_invalid_parameter_type(&param.param_type) {
                self.error(
                    &param.span,
                    TypeError::InvalidParameterType(param.param_type.clone()),
                );
            }
        }
    }

    /// Validate a defined variable and rewrite its initializer to the
    /// declared type.
    pub(crate) fn check_variable(&mut self, var: &mut Declaration) {
        if is_invalid_variable_type(&var.decl_type) {
            self.error(&var.span, TypeError::InvalidVariableType);
            return;
        }
        if let Some(mut init) = var.initializer.take() {
            if is_invalid_lhs_type(&var.decl_type) {
                self.error(&var.span, TypeError::InvalidLhsType(var.decl_type.clone()));
                var.initializer = Some(init);
                return;
            }
            self.check_expression(&mut init);
            var.initializer = Some(self.implicit_cast(&var.decl_type, init));
        }
    }

    /// Assignment-target admissibility. Parameters are always assignable;
    /// arrays declared as parameters have decayed to pointers.
    pub(crate) fn check_lhs(&mut self, lhs: &Expression) -> bool {
        if lhs.is_parameter() {
            return true;
        }
        let Some(t) = lhs.ty() else { return false };
        if is_invalid_lhs_type(t) {
            let t = t.clone();
            self.error(&lhs.span, TypeError::InvalidLhsType(t));
            return false;
        }
        true
    }

    /// Assigned-value admissibility.
    pub(crate) fn check_rhs(&mut self, rhs: &Expression) -> bool {
        let Some(t) = rhs.ty() else { return false };
        if is_invalid_rhs_type(t) {
            let t = t.clone();
            self.error(&rhs.span, TypeError::InvalidRhsType(t));
            return false;
        }
        true
    }

    pub(crate) fn must_be_integer(&mut self, expr: &Expression, op: &str) -> bool {
        let Some(t) = expr.ty() else { return false };
        if !t.is_integer() {
            self.wrong_type_error(expr, op);
            return false;
        }
        true
    }

    pub(crate) fn must_be_scalar(&mut self, expr: &Expression, op: &str) -> bool {
        let Some(t) = expr.ty() else { return false };
        if !t.is_scalar() {
            self.wrong_type_error(expr, op);
            return false;
        }
        true
    }

    pub(crate) fn wrong_type_error(&mut self, expr: &Expression, op: &str) {
        if let Some(t) = expr.ty() {
            let err = TypeError::WrongOperandType {
                op: op.to_string(),
                operand_type: t.clone(),
            };
            self.error(&expr.span, err);
        }
    }

    pub(crate) fn error(&mut self, span: &SourceSpan, err: TypeError) {
        self.handler.error(span.clone(), err.to_string());
    }

    pub(crate) fn warn(&mut self, span: &SourceSpan, err: TypeError) {
        self.handler.warn(span.clone(), err.to_string());
    }

    pub(crate) fn types(&self) -> &TypeTable {
        self.types
    }

    pub(crate) fn current_return_type(&self) -> Option<Type> {
        self.current_return_type.clone()
    }
}

fn is_invalid_return_type(t: &Type) -> bool {
    t.is_struct() || t.is_union() || t.is_array()
}

fn is_invalid_parameter_type(t: &Type) -> bool {
    t.is_struct() || t.is_union() || t.is_void() || t.is_incomplete_array()
}

fn is_invalid_variable_type(t: &Type) -> bool {
    t.is_void() || (t.is_array() && !t.is_allocated_array())
}

// Arrays are acceptable assignment targets only when declared as parameters.
fn is_invalid_lhs_type(t: &Type) -> bool {
    t.is_struct() || t.is_union() || t.is_void() || t.is_array()
}

fn is_invalid_rhs_type(t: &Type) -> bool {
    t.is_struct() || t.is_union() || t.is_void()
}

pub(crate) fn is_invalid_statement_type(t: &Type) -> bool {
    t.is_struct() || t.is_union()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_predicates() {
        let array = Type::Array {
            element_type: Box::new(Type::Int),
            size: Some(4),
        };
        let incomplete = Type::Array {
            element_type: Box::new(Type::Int),
            size: None,
        };
        let record = Type::Struct {
            name: "point".to_string(),
            fields: vec![],
        };

        assert!(is_invalid_return_type(&array));
        assert!(is_invalid_return_type(&record));
        assert!(!is_invalid_return_type(&Type::Void));

        assert!(is_invalid_parameter_type(&Type::Void));
        assert!(is_invalid_parameter_type(&incomplete));
        assert!(!is_invalid_parameter_type(&array));

        assert!(is_invalid_variable_type(&Type::Void));
        assert!(is_invalid_variable_type(&incomplete));
        assert!(!is_invalid_variable_type(&array));

        assert!(is_invalid_lhs_type(&array));
        assert!(!is_invalid_lhs_type(&Type::Int));

        assert!(is_invalid_rhs_type(&record));
        assert!(!is_invalid_rhs_type(&Type::Int));

        assert!(is_invalid_statement_type(&record));
        assert!(!is_invalid_statement_type(&Type::Void));
    }
}
