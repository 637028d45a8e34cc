//! Lexical scope tables and name resolution.
//!
//! A [`ScopeTree`] is an arena of [`ScopeTable`]s addressed by [`ScopeId`].
//! Each table links to its enclosing table through a non-owning `outer` ID,
//! so the tree mirrors the lexical nesting of functions and classes inside
//! one compilation unit. The root is always the unit table.
//!
//! # Resolution
//!
//! [`ScopeTree::resolve`] classifies a reference as:
//!
//! - [`Address::Local`]: bound in the requesting function scope itself
//! - [`Address::Global`]: first bound in the unit or a class (including when
//!   referenced from that same scope), or not bound anywhere; looked up by
//!   name at evaluation time
//! - [`Address::Captured`]: first bound in an enclosing function, i.e. a
//!   closure variable living in that function's frame

use std::fmt;

use rustc_hash::FxHashMap;
use sparrow_ir::Name;

use crate::error::{ScopeOp, SymbolError, SymbolResult};

/// Index of a [`ScopeTable`] in a [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The unit scope every tree is rooted at.
    pub const UNIT: ScopeId = ScopeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// What syntactic construct a scope belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Scopes not tied to a function, class, or unit. Resolved like
    /// function scopes.
    #[default]
    Unknown,
    /// Top-level scope of a compilation unit.
    Unit,
    Class,
    Function,
}

impl ScopeKind {
    /// Whether bindings first found in a scope of this kind are looked up by
    /// name rather than by frame slot.
    #[inline]
    pub fn binds_by_name(self) -> bool {
        matches!(self, ScopeKind::Unit | ScopeKind::Class)
    }
}

/// Frame-relative storage index of a local binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Slot(u32);

impl Slot {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Slot(index)
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

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// Where the evaluator finds a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    /// Slot in the current call frame.
    Local(Slot),
    /// Name-keyed global or class-member lookup.
    Global,
    /// Slot in the frame of an enclosing function.
    Captured(Slot),
}

impl Address {
    #[inline]
    pub fn is_local(self) -> bool {
        matches!(self, Address::Local(_))
    }

    #[inline]
    pub fn is_global(self) -> bool {
        matches!(self, Address::Global)
    }

    #[inline]
    pub fn is_captured(self) -> bool {
        matches!(self, Address::Captured(_))
    }

    /// The frame slot, for local and captured addresses.
    #[inline]
    pub fn slot(self) -> Option<Slot> {
        match self {
            Address::Local(slot) | Address::Captured(slot) => Some(slot),
            Address::Global => None,
        }
    }
}

/// Bindings of one lexical scope.
#[derive(Clone, Debug)]
pub struct ScopeTable {
    kind: ScopeKind,
    outer: Option<ScopeId>,
    bindings: FxHashMap<Name, Slot>,
    /// Bound names in slot order.
    order: Vec<Name>,
    /// Class name to class scope. Only populated on the unit table.
    classes: FxHashMap<Name, ScopeId>,
}

impl ScopeTable {
    fn new(kind: ScopeKind, outer: Option<ScopeId>) -> Self {
        Self {
            kind,
            outer,
            bindings: FxHashMap::default(),
            order: Vec::new(),
            classes: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    #[inline]
    pub fn outer(&self) -> Option<ScopeId> {
        self.outer
    }

    /// Number of slots declared here; the minimum frame size for a call.
    #[inline]
    pub fn size(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Slot of `name` if it is declared directly in this scope.
    #[inline]
    pub fn slot(&self, name: Name) -> Option<Slot> {
        self.bindings.get(&name).copied()
    }

    /// Declared names, indexed by slot.
    pub fn names(&self) -> &[Name] {
        &self.order
    }

    fn bind(&mut self, name: Name) -> Slot {
        if let Some(slot) = self.slot(name) {
            return slot;
        }
        let len = self.order.len();
        let slot = Slot::new(
            u32::try_from(len).unwrap_or_else(|_| panic!("too many locals in one scope: {len}")),
        );
        self.bindings.insert(name, slot);
        self.order.push(name);
        slot
    }
}

/// Arena of scope tables rooted at a unit scope.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    tables: Vec<ScopeTable>,
}

impl ScopeTree {
    /// Create a tree holding only the unit scope.
    pub fn new() -> Self {
        Self {
            tables: vec![ScopeTable::new(ScopeKind::Unit, None)],
        }
    }

    #[inline]
    pub fn unit(&self) -> ScopeId {
        ScopeId::UNIT
    }

    /// Open a new scope nested in `outer`.
    ///
    /// The unit scope is created with the tree and cannot be opened again.
    /// Class scopes may only be opened directly under the unit.
    pub fn open(&mut self, kind: ScopeKind, outer: ScopeId) -> SymbolResult<ScopeId> {
        let outer_kind = self.table(outer).kind;
        let misplaced = match kind {
            ScopeKind::Unit => true,
            ScopeKind::Class => outer_kind != ScopeKind::Unit,
            ScopeKind::Function | ScopeKind::Unknown => false,
        };
        if misplaced {
            return Err(SymbolError::InvalidScopeOperation {
                op: ScopeOp::Open,
                kind,
            });
        }

        let len = self.tables.len();
        let id = ScopeId(u32::try_from(len).unwrap_or_else(|_| panic!("too many scopes: {len}")));
        self.tables.push(ScopeTable::new(kind, Some(outer)));
        tracing::debug!(?id, ?kind, ?outer, "opened scope");
        Ok(id)
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn table(&self, id: ScopeId) -> &ScopeTable {
        &self.tables[id.index()]
    }

    /// Number of scopes, including the unit.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Always false: the unit scope exists from construction.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Declare `name` in `scope`, returning its slot.
    ///
    /// Re-declaring a name already bound in the same scope returns the
    /// existing slot.
    pub fn declare_local(&mut self, scope: ScopeId, name: Name) -> Slot {
        self.tables[scope.index()].bind(name)
    }

    /// Declare a formal parameter.
    ///
    /// Parameters always get a slot in the function's own scope, even when
    /// the same name is bound in an enclosing or global scope, so a later
    /// [`resolve`](Self::resolve) from this scope yields `Local`.
    pub fn force_local(&mut self, scope: ScopeId, name: Name) -> Slot {
        let slot = self.tables[scope.index()].bind(name);
        tracing::trace!(?scope, ?name, ?slot, "forced local");
        slot
    }

    /// Number of local slots declared in `scope`.
    #[inline]
    pub fn size(&self, scope: ScopeId) -> usize {
        self.table(scope).size()
    }

    /// Iterate `scope` and its enclosing scopes, innermost first.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&id| self.table(id).outer)
    }

    /// Find the innermost scope in the chain that declares `name`.
    pub fn locate(&self, scope: ScopeId, name: Name) -> Option<(ScopeId, Slot)> {
        self.chain(scope)
            .find_map(|id| self.table(id).slot(name).map(|slot| (id, slot)))
    }

    /// Classify a reference to `name` made from `scope`.
    pub fn resolve(&self, scope: ScopeId, name: Name) -> Address {
        let address = match self.locate(scope, name) {
            // Unit and class slots are never addressed, even from their own scope.
            Some((found, _)) if self.table(found).kind.binds_by_name() => Address::Global,
            Some((found, slot)) if found == scope => Address::Local(slot),
            Some((_, slot)) => Address::Captured(slot),
            None => Address::Global,
        };
        tracing::trace!(?scope, ?name, ?address, "resolved");
        address
    }

    /// Register the scope of class `name`. Only valid on the unit scope, and
    /// `class` must be a class scope of this tree. An ID from another tree
    /// is reported with kind `Unknown`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn put_class(&mut self, scope: ScopeId, name: Name, class: ScopeId) -> SymbolResult<()> {
        let unit_kind = self.table(scope).kind;
        if unit_kind != ScopeKind::Unit {
            return Err(SymbolError::InvalidScopeOperation {
                op: ScopeOp::PutClass,
                kind: unit_kind,
            });
        }
        let class_kind = self.tables.get(class.index()).map(|t| t.kind);
        if class_kind != Some(ScopeKind::Class) {
            return Err(SymbolError::InvalidScopeOperation {
                op: ScopeOp::PutClass,
                kind: class_kind.unwrap_or_default(),
            });
        }
        self.tables[scope.index()].classes.insert(name, class);
        tracing::debug!(?name, ?class, "registered class");
        Ok(())
    }

    /// Look up the scope registered for class `name`. Only valid on the
    /// unit scope.
    pub fn get_class(&self, scope: ScopeId, name: Name) -> SymbolResult<Option<ScopeId>> {
        let table = self.table(scope);
        if table.kind != ScopeKind::Unit {
            return Err(SymbolError::InvalidScopeOperation {
                op: ScopeOp::GetClass,
                kind: table.kind,
            });
        }
        Ok(table.classes.get(&name).copied())
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
