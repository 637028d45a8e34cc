//! Sparrow IR - shared front-end types.
//!
//! This crate holds the data carriers the symbol-resolution core works on:
//! - Names for interned identifiers
//! - Literal keys (floats stored as bits for Hash compatibility)
//! - The flat AST handed to the analysis pass
//!
//! Strings are interned to `Name(u32)`, expressions are flattened into
//! `ExprId(u32)` indices.

pub mod ast;
mod interner;
mod literal;
mod name;

pub use ast::{
    BinaryOp, ClassDef, ExprArena, ExprId, ExprKind, ExprRange, FieldDef, FunctionDef, FunctionId,
    Item, Unit,
};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use literal::FloatBits;
pub use name::Name;
