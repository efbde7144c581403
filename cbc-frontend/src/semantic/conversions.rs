//! Conversion algebra: integral promotion, usual arithmetic conversion,
//! and implicit-cast materialization.

use super::{TypeChecker, TypeError};
use crate::ast::Expression;
use crate::types::Type;

impl TypeChecker<'_> {
    /// Makes a language-mandated conversion explicit.
    ///
    /// Returns `expr` unchanged when it already has the target type, wraps
    /// it in a cast when convertible (warning on incompatible non-literal
    /// narrowings), and on an impossible conversion reports the error and
    /// returns the original so traversal can continue.
    pub(crate) fn implicit_cast(&mut self, target: &Type, expr: Expression) -> Expression {
        let Some(expr_type) = expr.ty().cloned() else {
            return expr;
        };
        if expr_type == *target {
            return expr;
        }
        if expr_type.is_castable_to(target) {
            if !expr_type.is_compatible(target) && !self.is_safe_integer_cast(&expr, target) {
                self.warn(
                    &expr.span,
                    TypeError::IncompatibleImplicitCast {
                        from: expr_type,
                        to: target.clone(),
                    },
                );
            }
            Expression::cast(target.clone(), expr)
        } else {
            self.error(
                &expr.span,
                TypeError::InvalidCast {
                    from: expr_type,
                    to: target.clone(),
                },
            );
            expr
        }
    }

    /// Integral promotion: integers narrower than int widen to signed int.
    ///
    /// Callers guarantee an integer argument; anything else is an internal
    /// invariant violation.
    pub(crate) fn integral_promotion(&self, t: &Type) -> Type {
        if !t.is_integer() {
            panic!("must not happen: integral promotion on non-integer type {t}");
        }
        let int = self.types().signed_int();
        if t.size() < int.size() {
            int
        } else {
            t.clone()
        }
    }

    /// Usual arithmetic conversion for two integrally promoted types.
    pub(crate) fn usual_arithmetic_conversion(&self, l: &Type, r: &Type) -> Type {
        let s_int = self.types().signed_int();
        let u_int = self.types().unsigned_int();
        let s_long = self.types().signed_long();
        let u_long = self.types().unsigned_long();

        if (*l == u_int && *r == s_long) || (*r == u_int && *l == s_long) {
            u_long
        } else if *l == u_long || *r == u_long {
            u_long
        } else if *l == s_long || *r == s_long {
            s_long
        } else if *l == u_int || *r == u_int {
            u_int
        } else {
            s_int
        }
    }

    /// True for integer literals whose value fits the target's domain.
    /// Such narrowings carry no warning (`char c = 0;`).
    pub(crate) fn is_safe_integer_cast(&self, expr: &Expression, target: &Type) -> bool {
        if !target.is_integer() {
            return false;
        }
        match expr.integer_literal_value() {
            Some(value) => target.is_in_domain(value),
            None => false,
        }
    }

    /// Wraps an integer expression in a cast to its promoted type when the
    /// promotion widens; leaves non-integers untouched so the promotion
    /// precondition holds.
    pub(crate) fn integral_promoted_expr(&mut self, expr: Expression) -> Expression {
        let Some(t) = expr.ty().cloned() else {
            return expr;
        };
        if !t.is_integer() {
            return expr;
        }
        let promoted = self.integral_promotion(&t);
        if promoted == t {
            expr
        } else {
            Expression::cast(promoted, expr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionKind;
    use crate::types::TypeTable;
    use cbc_common::{ErrorHandler, SourceSpan};

    fn literal(value: i64, ty: Type) -> Expression {
        Expression::with_type(ExpressionKind::IntLiteral(value), SourceSpan::dummy(), ty)
    }

    #[test]
    fn test_integral_promotion() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let checker = TypeChecker::new(&table, &mut handler);

        assert_eq!(checker.integral_promotion(&Type::Char), Type::Int);
        assert_eq!(checker.integral_promotion(&Type::UnsignedChar), Type::Int);
        assert_eq!(checker.integral_promotion(&Type::Short), Type::Int);
        assert_eq!(checker.integral_promotion(&Type::Int), Type::Int);
        assert_eq!(checker.integral_promotion(&Type::UnsignedInt), Type::UnsignedInt);
        assert_eq!(checker.integral_promotion(&Type::Long), Type::Long);
    }

    #[test]
    fn test_integral_promotion_idempotent() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let checker = TypeChecker::new(&table, &mut handler);

        for t in [Type::Char, Type::Short, Type::Int, Type::UnsignedLong] {
            let once = checker.integral_promotion(&t);
            let twice = checker.integral_promotion(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    #[should_panic(expected = "integral promotion")]
    fn test_integral_promotion_rejects_non_integer() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let checker = TypeChecker::new(&table, &mut handler);
        checker.integral_promotion(&Type::Void);
    }

    #[test]
    fn test_usual_arithmetic_conversion() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let checker = TypeChecker::new(&table, &mut handler);

        // unsigned int against signed long widens to unsigned long
        assert_eq!(
            checker.usual_arithmetic_conversion(&Type::UnsignedInt, &Type::Long),
            Type::UnsignedLong
        );
        assert_eq!(
            checker.usual_arithmetic_conversion(&Type::UnsignedLong, &Type::Int),
            Type::UnsignedLong
        );
        assert_eq!(
            checker.usual_arithmetic_conversion(&Type::Long, &Type::Int),
            Type::Long
        );
        assert_eq!(
            checker.usual_arithmetic_conversion(&Type::UnsignedInt, &Type::Int),
            Type::UnsignedInt
        );
        assert_eq!(
            checker.usual_arithmetic_conversion(&Type::Int, &Type::Int),
            Type::Int
        );
    }

    #[test]
    fn test_usual_arithmetic_conversion_symmetry() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let checker = TypeChecker::new(&table, &mut handler);

        let promoted = [Type::Int, Type::UnsignedInt, Type::Long, Type::UnsignedLong];
        for a in &promoted {
            for b in &promoted {
                assert_eq!(
                    checker.usual_arithmetic_conversion(a, b),
                    checker.usual_arithmetic_conversion(b, a),
                    "conversion of {a} and {b} must be symmetric"
                );
            }
        }
    }

    #[test]
    fn test_safe_integer_cast() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let checker = TypeChecker::new(&table, &mut handler);

        assert!(checker.is_safe_integer_cast(&literal(0, Type::Int), &Type::Char));
        assert!(!checker.is_safe_integer_cast(&literal(300, Type::Int), &Type::Char));
        assert!(!checker.is_safe_integer_cast(
            &Expression::with_type(
                ExpressionKind::Variable {
                    name: "x".to_string(),
                    is_parameter: false,
                },
                SourceSpan::dummy(),
                Type::Int,
            ),
            &Type::Char
        ));
    }

    #[test]
    fn test_implicit_cast_noop_on_same_type() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let mut checker = TypeChecker::new(&table, &mut handler);

        let expr = literal(1, Type::Int);
        let result = checker.implicit_cast(&Type::Int, expr.clone());
        assert_eq!(result, expr);
        assert!(!handler.error_occurred());
        assert_eq!(handler.warning_count(), 0);
    }

    #[test]
    fn test_implicit_cast_narrowing_warns() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let mut checker = TypeChecker::new(&table, &mut handler);

        let var = Expression::with_type(
            ExpressionKind::Variable {
                name: "i".to_string(),
                is_parameter: false,
            },
            SourceSpan::dummy(),
            Type::Int,
        );
        let result = checker.implicit_cast(&Type::Short, var);
        assert_eq!(result.expr_type, Some(Type::Short));
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(
            handler.diagnostics()[0].message,
            "incompatible implicit cast from int to short"
        );
    }

    #[test]
    fn test_implicit_cast_invalid_reports_error() {
        let table = TypeTable::ilp32();
        let mut handler = ErrorHandler::new();
        let mut checker = TypeChecker::new(&table, &mut handler);

        let expr = literal(1, Type::Int);
        let result = checker.implicit_cast(&Type::Void, expr.clone());
        // original expression survives so traversal can continue
        assert_eq!(result, expr);
        assert!(handler.error_occurred());
        assert_eq!(
            handler.diagnostics()[0].message,
            "invalid cast from int to void"
        );
    }
}
