use super::*;
use pretty_assertions::assert_eq;
use sparrow_ir::StringInterner;

fn slot(n: u32) -> Slot {
    Slot::new(n)
}

#[test]
fn test_declare_assigns_sequential_slots() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));

    let mut tree = ScopeTree::new();
    let f = tree.open(ScopeKind::Function, tree.unit()).unwrap();

    assert_eq!(tree.declare_local(f, a), slot(0));
    assert_eq!(tree.declare_local(f, b), slot(1));
    assert_eq!(tree.size(f), 2);
    assert_eq!(tree.table(f).names(), &[a, b]);
}

#[test]
fn test_redeclare_is_idempotent() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut tree = ScopeTree::new();
    let f = tree.open(ScopeKind::Function, tree.unit()).unwrap();

    let first = tree.declare_local(f, x);
    assert_eq!(tree.declare_local(f, x), first);
    assert_eq!(tree.force_local(f, x), first);
    assert_eq!(tree.size(f), 1);
}

#[test]
fn test_local_shadows_outer() {
    let interner = StringInterner::new();
    let (x, y) = (interner.intern("x"), interner.intern("y"));

    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    tree.declare_local(unit, x);
    let outer = tree.open(ScopeKind::Function, unit).unwrap();
    tree.declare_local(outer, x);
    let inner = tree.open(ScopeKind::Function, outer).unwrap();
    tree.declare_local(inner, y);
    tree.declare_local(inner, x);

    assert_eq!(tree.resolve(inner, x), Address::Local(slot(1)));
    assert_eq!(tree.resolve(outer, x), Address::Local(slot(0)));
}

#[test]
fn test_unit_binding_is_global_from_depth_three() {
    let interner = StringInterner::new();
    let g = interner.intern("g");

    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    tree.declare_local(unit, g);
    let f1 = tree.open(ScopeKind::Function, unit).unwrap();
    let f2 = tree.open(ScopeKind::Function, f1).unwrap();
    let f3 = tree.open(ScopeKind::Function, f2).unwrap();

    assert_eq!(tree.resolve(f3, g), Address::Global);
}

#[test]
fn test_unit_binding_is_global_from_unit() {
    let interner = StringInterner::new();
    let g = interner.intern("g");

    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    assert_eq!(tree.declare_local(unit, g), slot(0));

    assert_eq!(tree.resolve(unit, g), Address::Global);
    assert_eq!(tree.size(unit), 1);
}

#[test]
fn test_class_binding_is_global_from_class() {
    let interner = StringInterner::new();
    let (a, b) = (interner.intern("a"), interner.intern("b"));

    let mut tree = ScopeTree::new();
    let class = tree.open(ScopeKind::Class, tree.unit()).unwrap();
    tree.declare_local(class, a);
    tree.declare_local(class, b);
    let method = tree.open(ScopeKind::Function, class).unwrap();

    assert_eq!(tree.resolve(class, a), Address::Global);
    assert_eq!(tree.resolve(method, a), Address::Global);
    assert_eq!(tree.resolve(class, b), tree.resolve(method, b));
}

#[test]
fn test_closure_capture() {
    let interner = StringInterner::new();
    let (a, x) = (interner.intern("a"), interner.intern("x"));

    let mut tree = ScopeTree::new();
    let fa = tree.open(ScopeKind::Function, tree.unit()).unwrap();
    tree.declare_local(fa, a);
    let x_slot = tree.declare_local(fa, x);
    let fb = tree.open(ScopeKind::Function, fa).unwrap();

    assert_eq!(tree.resolve(fb, x), Address::Captured(x_slot));
    assert_eq!(tree.resolve(fa, x), Address::Local(x_slot));
    assert_eq!(x_slot, slot(1));
}

#[test]
fn test_capture_through_intermediate_functions() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut tree = ScopeTree::new();
    let outer = tree.open(ScopeKind::Function, tree.unit()).unwrap();
    tree.declare_local(outer, x);
    let middle = tree.open(ScopeKind::Function, outer).unwrap();
    let inner = tree.open(ScopeKind::Function, middle).unwrap();

    assert_eq!(tree.resolve(inner, x), Address::Captured(slot(0)));
}

#[test]
fn test_unknown_scope_binding_is_captured() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut tree = ScopeTree::new();
    let block = tree.open(ScopeKind::Unknown, tree.unit()).unwrap();
    tree.declare_local(block, x);
    let f = tree.open(ScopeKind::Function, block).unwrap();

    assert_eq!(tree.resolve(f, x), Address::Captured(slot(0)));
}

#[test]
fn test_class_member_is_global_from_method() {
    let interner = StringInterner::new();
    let field = interner.intern("count");

    let mut tree = ScopeTree::new();
    let class = tree.open(ScopeKind::Class, tree.unit()).unwrap();
    tree.declare_local(class, field);
    let method = tree.open(ScopeKind::Function, class).unwrap();

    assert_eq!(tree.resolve(method, field), Address::Global);
}

#[test]
fn test_unresolved_name_is_global() {
    let interner = StringInterner::new();
    let missing = interner.intern("missing");

    let mut tree = ScopeTree::new();
    let f = tree.open(ScopeKind::Function, tree.unit()).unwrap();

    assert_eq!(tree.resolve(f, missing), Address::Global);
    assert_eq!(tree.resolve(tree.unit(), missing), Address::Global);
    assert_eq!(tree.locate(f, missing), None);
}

#[test]
fn test_force_local_beats_global() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    tree.declare_local(unit, x);
    let f = tree.open(ScopeKind::Function, unit).unwrap();
    assert_eq!(tree.resolve(f, x), Address::Global);

    let param = tree.force_local(f, x);
    assert_eq!(tree.resolve(f, x), Address::Local(param));
}

#[test]
fn test_locate_reports_declaring_scope() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut tree = ScopeTree::new();
    let outer = tree.open(ScopeKind::Function, tree.unit()).unwrap();
    tree.declare_local(outer, x);
    let inner = tree.open(ScopeKind::Function, outer).unwrap();

    assert_eq!(tree.locate(inner, x), Some((outer, slot(0))));
}

#[test]
fn test_chain_walks_to_unit() {
    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    let class = tree.open(ScopeKind::Class, unit).unwrap();
    let method = tree.open(ScopeKind::Function, class).unwrap();

    let chain: Vec<_> = tree.chain(method).collect();
    assert_eq!(chain, vec![method, class, unit]);
    assert_eq!(tree.table(unit).outer(), None);
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_class_registry_round_trip() {
    let interner = StringInterner::new();
    let (point, other) = (interner.intern("Point"), interner.intern("Other"));

    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    let class = tree.open(ScopeKind::Class, unit).unwrap();

    tree.put_class(unit, point, class).unwrap();
    assert_eq!(tree.get_class(unit, point), Ok(Some(class)));
    assert_eq!(tree.get_class(unit, other), Ok(None));
}

#[test]
fn test_class_registry_rejected_off_unit() {
    let interner = StringInterner::new();
    let point = interner.intern("Point");

    let mut tree = ScopeTree::new();
    let class = tree.open(ScopeKind::Class, tree.unit()).unwrap();
    let method = tree.open(ScopeKind::Function, class).unwrap();

    assert_eq!(
        tree.put_class(method, point, class),
        Err(SymbolError::InvalidScopeOperation {
            op: ScopeOp::PutClass,
            kind: ScopeKind::Function,
        })
    );
    assert_eq!(
        tree.get_class(class, point),
        Err(SymbolError::InvalidScopeOperation {
            op: ScopeOp::GetClass,
            kind: ScopeKind::Class,
        })
    );
}

#[test]
fn test_put_class_requires_class_scope() {
    let interner = StringInterner::new();
    let point = interner.intern("Point");

    let mut tree = ScopeTree::new();
    let unit = tree.unit();
    let f = tree.open(ScopeKind::Function, unit).unwrap();

    assert_eq!(
        tree.put_class(unit, point, f),
        Err(SymbolError::InvalidScopeOperation {
            op: ScopeOp::PutClass,
            kind: ScopeKind::Function,
        })
    );
    assert_eq!(
        tree.put_class(unit, point, ScopeId(99)),
        Err(SymbolError::InvalidScopeOperation {
            op: ScopeOp::PutClass,
            kind: ScopeKind::Unknown,
        })
    );
    assert_eq!(tree.get_class(unit, point), Ok(None));
}

#[test]
fn test_open_rejects_misplaced_scopes() {
    let mut tree = ScopeTree::new();
    let f = tree.open(ScopeKind::Function, tree.unit()).unwrap();

    assert_eq!(
        tree.open(ScopeKind::Class, f),
        Err(SymbolError::InvalidScopeOperation {
            op: ScopeOp::Open,
            kind: ScopeKind::Class,
        })
    );
    assert!(tree.open(ScopeKind::Unit, f).is_err());
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_address_helpers() {
    assert!(Address::Local(slot(3)).is_local());
    assert!(Address::Captured(slot(3)).is_captured());
    assert!(Address::Global.is_global());
    assert_ne!(Address::Local(slot(3)), Address::Captured(slot(3)));
    assert_eq!(Address::Captured(slot(3)).slot(), Some(slot(3)));
    assert_eq!(Address::Global.slot(), None);
}

#[test]
fn test_error_messages() {
    let err = SymbolError::InvalidScopeOperation {
        op: ScopeOp::PutClass,
        kind: ScopeKind::Function,
    };
    assert_eq!(
        err.to_string(),
        "invalid scope operation: put_class on Function scope"
    );
}
