//! Literal constant pools.
//!
//! [`ConstantPool`] deduplicates literal values of one kind and hands out
//! dense [`ConstantId`]s in first-seen order. [`LiteralPools`] bundles one
//! pool per literal kind and is owned by whoever drives the analysis pass.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use sparrow_ir::{FloatBits, Name};

use crate::error::{SymbolError, SymbolResult};

/// Index into a [`ConstantPool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ConstantId(u32);

impl ConstantId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ConstantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstantId({})", self.0)
    }
}

/// Append-only pool of distinct values, indexed by [`ConstantId`].
///
/// Interning an equal value twice returns the same ID. IDs are dense from 0
/// and stay valid for the lifetime of the pool.
#[derive(Clone, Debug)]
pub struct ConstantPool<T> {
    values: Vec<T>,
    dedup: FxHashMap<T, ConstantId>,
}

impl<T: Clone + Eq + Hash> ConstantPool<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            dedup: FxHashMap::default(),
        }
    }

    /// Intern a value. Returns the existing ID if already interned.
    ///
    /// # Panics
    /// Panics if the pool outgrows the `u32` index space.
    pub fn intern(&mut self, value: T) -> ConstantId {
        if let Some(&id) = self.dedup.get(&value) {
            return id;
        }
        let len = self.values.len();
        let id = ConstantId::new(
            u32::try_from(len).unwrap_or_else(|_| panic!("too many constants: {len}")),
        );
        self.dedup.insert(value.clone(), id);
        self.values.push(value);
        id
    }

    /// Look up the ID of an already interned value without inserting.
    pub fn find(&self, value: &T) -> Option<ConstantId> {
        self.dedup.get(value).copied()
    }

    /// Get a constant value by ID.
    pub fn get(&self, id: ConstantId) -> SymbolResult<&T> {
        self.values.get(id.index()).ok_or(SymbolError::OutOfRange {
            index: id.index(),
            len: self.values.len(),
        })
    }

    /// Number of interned constants.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The pool contents in ID order, for emitting a constant segment.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Iterate `(id, value)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ConstantId, &T)> + '_ {
        // `intern` caps the length at u32::MAX, so every index fits.
        (0u32..).zip(&self.values).map(|(i, v)| (ConstantId::new(i), v))
    }
}

impl<T: Clone + Eq + Hash> Default for ConstantPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for ConstantPool<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<T: Eq> Eq for ConstantPool<T> {}

/// A constant ID tagged with the pool it indexes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstRef {
    Int(ConstantId),
    Float(ConstantId),
    Str(ConstantId),
}

impl ConstRef {
    pub fn id(self) -> ConstantId {
        match self {
            ConstRef::Int(id) | ConstRef::Float(id) | ConstRef::Str(id) => id,
        }
    }
}

/// One constant pool per literal kind.
///
/// Scoped to a single compilation unit and passed explicitly to
/// [`analyze`](crate::analyze).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiteralPools {
    pub ints: ConstantPool<i64>,
    pub floats: ConstantPool<FloatBits>,
    /// String literals, by interned text.
    pub strs: ConstantPool<Name>,
}

impl LiteralPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_int(&mut self, value: i64) -> ConstRef {
        ConstRef::Int(self.ints.intern(value))
    }

    pub fn intern_float(&mut self, value: FloatBits) -> ConstRef {
        ConstRef::Float(self.floats.intern(value))
    }

    pub fn intern_str(&mut self, value: Name) -> ConstRef {
        ConstRef::Str(self.strs.intern(value))
    }

    /// Fetch an integer constant. A `ConstRef` of another kind is out of
    /// range for this pool.
    pub fn get_int(&self, r: ConstRef) -> SymbolResult<i64> {
        match r {
            ConstRef::Int(id) => self.ints.get(id).copied(),
            other => Err(kind_mismatch(other, self.ints.len())),
        }
    }

    pub fn get_float(&self, r: ConstRef) -> SymbolResult<f64> {
        match r {
            ConstRef::Float(id) => self.floats.get(id).map(|bits| bits.to_f64()),
            other => Err(kind_mismatch(other, self.floats.len())),
        }
    }

    pub fn get_str(&self, r: ConstRef) -> SymbolResult<Name> {
        match r {
            ConstRef::Str(id) => self.strs.get(id).copied(),
            other => Err(kind_mismatch(other, self.strs.len())),
        }
    }
}

fn kind_mismatch(r: ConstRef, len: usize) -> SymbolError {
    SymbolError::OutOfRange {
        index: r.id().index(),
        len,
    }
}
