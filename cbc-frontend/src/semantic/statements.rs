//! Statement validation
//!
//! Enforces the statement-form invariants: condition expressions are
//! scalar, switch scrutinees are integer, return statements agree with the
//! function's return type, and bare expression statements have an
//! admissible type.

use super::{is_invalid_statement_type, TypeChecker, TypeError};
use crate::ast::{Block, Expression, Statement, StatementKind};
use crate::types::Type;
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    pub(crate) fn check_block(&mut self, block: &mut Block) {
        for var in &mut block.variables {
            self.check_variable(var);
        }
        for stmt in &mut block.statements {
            self.check_statement(stmt);
        }
    }

    fn check_statement(&mut self, stmt: &mut Statement) {
        match &mut stmt.kind {
            StatementKind::Expression(expr) => {
                self.check_expression(expr);
                if let Some(t) = expr.ty() {
                    if is_invalid_statement_type(t) {
                        let t = t.clone();
                        self.error(&stmt.span, TypeError::InvalidStatementType(t));
                    }
                }
            }

            StatementKind::Block(block) => self.check_block(block),

            StatementKind::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                self.check_expression(condition);
                self.check_cond(condition);
                self.check_statement(then_stmt);
                if let Some(else_stmt) = else_stmt {
                    self.check_statement(else_stmt);
                }
            }

            StatementKind::While { condition, body } => {
                self.check_expression(condition);
                self.check_cond(condition);
                self.check_statement(body);
            }

            StatementKind::DoWhile { body, condition } => {
                self.check_statement(body);
                self.check_expression(condition);
                self.check_cond(condition);
            }

            StatementKind::For {
                init,
                condition,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.check_expression(init);
                }
                if let Some(condition) = condition {
                    self.check_expression(condition);
                    self.check_cond(condition);
                }
                if let Some(update) = update {
                    self.check_expression(update);
                }
                self.check_statement(body);
            }

            StatementKind::Switch { condition, cases } => {
                self.check_expression(condition);
                self.must_be_integer(condition, "switch");
                for case in cases {
                    for value in &mut case.values {
                        self.check_expression(value);
                    }
                    self.check_block(&mut case.body);
                }
            }

            StatementKind::Return(expr_opt) => self.check_return(&stmt.span, expr_opt),

            StatementKind::Label { statement, .. } => self.check_statement(statement),

            StatementKind::Break
            | StatementKind::Continue
            | StatementKind::Goto(_)
            | StatementKind::Empty => {}
        }
    }

    fn check_cond(&mut self, cond: &Expression) {
        self.must_be_scalar(cond, "condition expression");
    }

    fn check_return(&mut self, span: &SourceSpan, expr_opt: &mut Option<Expression>) {
        let Some(return_type) = self.current_return_type() else {
            return;
        };
        if return_type.is_void() {
            if let Some(expr) = expr_opt {
                self.check_expression(expr);
                self.error(span, TypeError::ReturningValueFromVoidFunction);
            }
            return;
        }
        match expr_opt.take() {
            None => self.error(span, TypeError::MissingReturnValue),
            Some(mut expr) => {
                self.check_expression(&mut expr);
                if expr.ty().map(Type::is_void).unwrap_or(false) {
                    self.error(span, TypeError::ReturningVoid);
                    *expr_opt = Some(expr);
                } else {
                    *expr_opt = Some(self.implicit_cast(&return_type, expr));
                }
            }
        }
    }
}
