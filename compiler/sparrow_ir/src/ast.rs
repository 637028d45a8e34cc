//! Flat AST consumed by symbol analysis.
//!
//! Expressions live in an [`ExprArena`] and reference each other through
//! [`ExprId`] indices; child lists are [`ExprRange`] slices of a shared
//! flat list. Function bodies are stored once and referenced by
//! [`FunctionId`] from top-level items, class methods, and nested
//! function expressions.

use std::fmt;

use crate::{FloatBits, Name};

/// Convert an arena length to a `u32` index.
///
/// # Panics
/// Panics if the arena outgrows the `u32` index space.
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

/// Index into an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Sentinel for an absent optional child (no else branch, bare return).
    pub const INVALID: ExprId = ExprId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ExprId({})", self.0)
        } else {
            write!(f, "ExprId::INVALID")
        }
    }
}

/// Index of a function definition in an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct FunctionId(u32);

impl FunctionId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        FunctionId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionId({})", self.0)
    }
}

/// A contiguous run of expression IDs in the arena's flat list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    pub const EMPTY: Self = Self { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for ExprRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExprRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

/// Expression variants.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExprKind {
    Int(i64),
    Float(FloatBits),
    /// String literal; the text is interned.
    Str(Name),
    /// Reference to a variable.
    Ident(Name),
    /// `let name = value` declares `name` in the current scope.
    Let { name: Name, value: ExprId },
    /// `name = value`
    Assign { target: Name, value: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Call { func: ExprId, args: ExprRange },
    /// `receiver.field`; the field is looked up by name at run time.
    Field { receiver: ExprId, field: Name },
    Block(ExprRange),
    If {
        cond: ExprId,
        then_branch: ExprId,
        /// `ExprId::INVALID` when there is no else branch.
        else_branch: ExprId,
    },
    While { cond: ExprId, body: ExprId },
    /// `ExprId::INVALID` for a bare `return`.
    Return(ExprId),
    /// Nested function definition or lambda.
    Function(FunctionId),
}

/// A function definition: top-level, method, nested, or anonymous.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDef {
    /// `None` for lambdas.
    pub name: Option<Name>,
    pub params: Vec<Name>,
    pub body: ExprId,
}

/// A class field with an optional initializer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldDef {
    pub name: Name,
    /// `ExprId::INVALID` when the field has no initializer.
    pub init: ExprId,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassDef {
    pub name: Name,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<FunctionId>,
}

/// A top-level item of a compilation unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Item {
    Function(FunctionId),
    Class(ClassDef),
    Stmt(ExprId),
}

/// A parsed compilation unit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Unit {
    pub items: Vec<Item>,
}

/// Storage for a unit's expressions and function definitions.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<ExprKind>,
    expr_lists: Vec<ExprId>,
    functions: Vec<FunctionDef>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its ID.
    pub fn alloc_expr(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len(), "expressions"));
        self.exprs.push(kind);
        id
    }

    /// Allocate a list of expression IDs, returning its range.
    ///
    /// # Panics
    /// Panics if the list is longer than `u16::MAX`.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        self.expr_lists.extend(ids);
        let len = self.expr_lists.len() - start as usize;
        let len = u16::try_from(len)
            .unwrap_or_else(|_| panic!("expression list too long: {len} exceeds u16::MAX"));
        ExprRange { start, len }
    }

    /// Allocate a function definition, returning its ID.
    pub fn alloc_function(&mut self, def: FunctionDef) -> FunctionId {
        let id = FunctionId::new(to_u32(self.functions.len(), "functions"));
        self.functions.push(def);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &FunctionDef {
        &self.functions[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}
