//! Errors raised by the symbol tables.
//!
//! Both variants are internal-consistency failures: the caller fabricated an
//! index or used a scope for something its kind does not support. An
//! undefined variable is never an error here; it resolves to
//! [`Address::Global`](crate::Address::Global).

use std::fmt;

use crate::ScopeKind;

/// The scope operation that was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeOp {
    PutClass,
    GetClass,
    /// Linking a new scope under an outer scope.
    Open,
}

impl fmt::Display for ScopeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeOp::PutClass => "put_class",
            ScopeOp::GetClass => "get_class",
            ScopeOp::Open => "open",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// A constant pool was indexed past its end.
    #[error("constant access out of range: index {index}, pool size {len}")]
    OutOfRange { index: usize, len: usize },

    /// A scope operation was applied to a scope of the wrong kind.
    #[error("invalid scope operation: {op} on {kind:?} scope")]
    InvalidScopeOperation { op: ScopeOp, kind: ScopeKind },
}

pub type SymbolResult<T> = Result<T, SymbolError>;
