//! cbc compiler - Frontend Core
//!
//! This crate provides the semantic core of the cbc compiler:
//! - AST: abstract syntax tree definitions, as produced by the parser and
//!   resolver layers
//! - Types: the C-subset type system and the platform type table
//! - Semantic analysis: the type-checking pass that validates the tree and
//!   makes every implicit conversion explicit
//!
//! The lexer, parser, resolver, and downstream IR generator live in the
//! host driver; this crate consumes a resolved AST and hands back the same
//! tree, fully typed and rewritten.

pub mod ast;
pub mod semantic;
pub mod types;

pub use ast::{
    BinaryOp, Block, CaseClause, Declaration, Expression, ExpressionKind, FunctionDefinition,
    IncDecOp, Parameter, Statement, StatementKind, TopLevelItem, TranslationUnit, UnaryOp,
};
pub use semantic::{TypeChecker, TypeError};
pub use types::{StructField, Type, TypeRef, TypeTable};
