//! Sparrow symbol tables.
//!
//! Assigns every identifier a storage address and every literal a constant
//! index during a single analysis pass, ahead of evaluation.
//!
//! # Pieces
//!
//! - [`ConstantPool`]: deduplicating, append-only store of literal values;
//!   [`LiteralPools`] holds one per literal kind
//! - [`ScopeTree`]: arena of per-scope tables linked to their outer scope,
//!   with the class registry on the unit scope
//! - [`ScopeTree::resolve`]: classifies a reference as [`Address::Local`],
//!   [`Address::Global`], or [`Address::Captured`]
//! - [`analyze`]: drives the tables over a [`Unit`](sparrow_ir::Unit)
//!
//! # Pipeline Position
//!
//! ```text
//! Source → Lex → Parse → **Symbol analysis** → Evaluate
//! ```

mod analyze;
mod error;
mod pool;
mod scope;

pub use analyze::{analyze, Analysis};
pub use error::{ScopeOp, SymbolError, SymbolResult};
pub use pool::{ConstRef, ConstantId, ConstantPool, LiteralPools};
pub use scope::{Address, ScopeId, ScopeKind, ScopeTable, ScopeTree, Slot};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding this crate's log filter.
pub const LOG_ENV: &str = "SPARROW_LOG";

/// Install a `fmt` subscriber for symbol-analysis logs.
///
/// The filter comes from `SPARROW_LOG`, falling back to `RUST_LOG`. With
/// neither set nothing is installed. Repeated calls are no-ops.
///
/// ```text
/// SPARROW_LOG=sparrow_symbols=trace   # every resolve() result
/// SPARROW_LOG=sparrow_symbols=debug   # scopes opened, classes registered
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) =
            EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_from_default_env())
        else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).without_time())
            .with(filter)
            .init();
    });
}
