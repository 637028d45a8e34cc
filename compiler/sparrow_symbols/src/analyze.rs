//! Symbol analysis pass.
//!
//! Walks a [`Unit`] depth-first, building its [`ScopeTree`] and recording,
//! per expression, the [`Address`] of every variable reference and the
//! [`ConstRef`] of every literal. The evaluator consumes these side tables
//! instead of re-resolving names.
//!
//! Scopes are opened as their construct is entered, so every scope is
//! linked under its outer scope before anything inside it is resolved.
//! There is no hoisting: a reference resolved before the enclosing function
//! declares the name falls through to `Global`.

use rustc_hash::FxHashMap;
use sparrow_ir::{ClassDef, ExprArena, ExprId, ExprKind, FunctionId, Item, Name, Unit};

use crate::error::SymbolResult;
use crate::pool::{ConstRef, LiteralPools};
use crate::scope::{Address, ScopeId, ScopeKind, ScopeTree};

/// Results of symbol analysis for one compilation unit.
#[derive(Clone, Debug)]
pub struct Analysis {
    scopes: ScopeTree,
    /// Identifier references and `let`/assignment targets.
    addresses: FxHashMap<ExprId, Address>,
    /// Literal expressions.
    constants: FxHashMap<ExprId, ConstRef>,
    function_scopes: FxHashMap<FunctionId, ScopeId>,
}

impl Analysis {
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Address recorded for an identifier, `let`, or assignment expression.
    pub fn address(&self, expr: ExprId) -> Option<Address> {
        self.addresses.get(&expr).copied()
    }

    /// Constant recorded for a literal expression.
    pub fn constant(&self, expr: ExprId) -> Option<ConstRef> {
        self.constants.get(&expr).copied()
    }

    pub fn function_scope(&self, function: FunctionId) -> Option<ScopeId> {
        self.function_scopes.get(&function).copied()
    }

    /// Number of slots a call frame for `function` must provide.
    pub fn frame_size(&self, function: FunctionId) -> Option<usize> {
        self.function_scope(function)
            .map(|scope| self.scopes.size(scope))
    }

    /// Slots needed for the unit's own top-level bindings.
    pub fn unit_size(&self) -> usize {
        self.scopes.size(self.scopes.unit())
    }

    /// Scope of the class registered under `name`.
    pub fn class_scope(&self, name: Name) -> Option<ScopeId> {
        // The registry lives on the unit scope, so the lookup cannot fail.
        self.scopes
            .get_class(self.scopes.unit(), name)
            .ok()
            .flatten()
    }
}

/// Analyze a compilation unit.
///
/// Literals are interned into `pools`, which the caller owns and may share
/// across passes over the same unit.
#[tracing::instrument(level = "debug", skip_all, fields(items = unit.items.len()))]
pub fn analyze(unit: &Unit, arena: &ExprArena, pools: &mut LiteralPools) -> SymbolResult<Analysis> {
    let mut analyzer = Analyzer {
        arena,
        pools,
        scopes: ScopeTree::new(),
        addresses: FxHashMap::default(),
        constants: FxHashMap::default(),
        function_scopes: FxHashMap::default(),
    };

    let top = analyzer.scopes.unit();
    for item in &unit.items {
        match item {
            Item::Function(id) => {
                if let Some(name) = arena.function(*id).name {
                    analyzer.scopes.declare_local(top, name);
                }
                analyzer.function(*id, top)?;
            }
            Item::Class(class) => analyzer.class(class)?,
            Item::Stmt(expr) => analyzer.expr(top, *expr)?,
        }
    }

    tracing::debug!(
        scopes = analyzer.scopes.len(),
        references = analyzer.addresses.len(),
        literals = analyzer.constants.len(),
        "symbol analysis complete"
    );

    Ok(Analysis {
        scopes: analyzer.scopes,
        addresses: analyzer.addresses,
        constants: analyzer.constants,
        function_scopes: analyzer.function_scopes,
    })
}

struct Analyzer<'a> {
    arena: &'a ExprArena,
    pools: &'a mut LiteralPools,
    scopes: ScopeTree,
    addresses: FxHashMap<ExprId, Address>,
    constants: FxHashMap<ExprId, ConstRef>,
    function_scopes: FxHashMap<FunctionId, ScopeId>,
}

impl Analyzer<'_> {
    fn class(&mut self, class: &ClassDef) -> SymbolResult<()> {
        let unit = self.scopes.unit();
        self.scopes.declare_local(unit, class.name);
        let scope = self.scopes.open(ScopeKind::Class, unit)?;
        self.scopes.put_class(unit, class.name, scope)?;

        for field in &class.fields {
            if field.init.is_valid() {
                self.expr(scope, field.init)?;
            }
            self.scopes.declare_local(scope, field.name);
        }
        for &method in &class.methods {
            if let Some(name) = self.arena.function(method).name {
                self.scopes.declare_local(scope, name);
            }
            self.function(method, scope)?;
        }
        Ok(())
    }

    /// A function reached a second time keeps the scope of its first visit.
    fn function(&mut self, id: FunctionId, outer: ScopeId) -> SymbolResult<ScopeId> {
        if let Some(&scope) = self.function_scopes.get(&id) {
            tracing::debug!(?id, ?scope, "function already analyzed");
            return Ok(scope);
        }
        let arena = self.arena;
        let def = arena.function(id);
        let scope = self.scopes.open(ScopeKind::Function, outer)?;
        for &param in &def.params {
            self.scopes.force_local(scope, param);
        }
        self.function_scopes.insert(id, scope);
        self.expr(scope, def.body)?;
        Ok(scope)
    }

    fn expr(&mut self, scope: ScopeId, id: ExprId) -> SymbolResult<()> {
        let arena = self.arena;
        match *arena.expr(id) {
            ExprKind::Int(value) => {
                let r = self.pools.intern_int(value);
                self.constants.insert(id, r);
            }
            ExprKind::Float(value) => {
                let r = self.pools.intern_float(value);
                self.constants.insert(id, r);
            }
            ExprKind::Str(value) => {
                let r = self.pools.intern_str(value);
                self.constants.insert(id, r);
            }
            ExprKind::Ident(name) => {
                let address = self.scopes.resolve(scope, name);
                self.addresses.insert(id, address);
            }
            ExprKind::Let { name, value } => {
                self.expr(scope, value)?;
                self.scopes.declare_local(scope, name);
                let address = self.scopes.resolve(scope, name);
                self.addresses.insert(id, address);
            }
            ExprKind::Assign { target, value } => {
                self.expr(scope, value)?;
                if self.scopes.locate(scope, target).is_none() {
                    self.scopes.declare_local(scope, target);
                }
                let address = self.scopes.resolve(scope, target);
                self.addresses.insert(id, address);
            }
            ExprKind::Binary { left, right, .. } => {
                self.expr(scope, left)?;
                self.expr(scope, right)?;
            }
            ExprKind::Call { func, args } => {
                self.expr(scope, func)?;
                for &arg in arena.list(args) {
                    self.expr(scope, arg)?;
                }
            }
            ExprKind::Field { receiver, .. } => self.expr(scope, receiver)?,
            ExprKind::Block(stmts) => {
                for &stmt in arena.list(stmts) {
                    self.expr(scope, stmt)?;
                }
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(scope, cond)?;
                self.expr(scope, then_branch)?;
                if else_branch.is_valid() {
                    self.expr(scope, else_branch)?;
                }
            }
            ExprKind::While { cond, body } => {
                self.expr(scope, cond)?;
                self.expr(scope, body)?;
            }
            ExprKind::Return(value) => {
                if value.is_valid() {
                    self.expr(scope, value)?;
                }
            }
            ExprKind::Function(function) => {
                if let Some(name) = arena.function(function).name {
                    self.scopes.declare_local(scope, name);
                }
                self.function(function, scope)?;
            }
        }
        Ok(())
    }
}
