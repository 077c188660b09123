use std::collections::BTreeSet;
use std::ops::ControlFlow;

use enum_family::prelude::*;
use enum_family::{Identity, SharedEnumSet};
use proptest::prelude::*;

enumeration! {
    /// Statement kinds of a small language.
    pub struct Statement;
    Decl,
    Empty,
    Labeled,
    Expr,
    Send,
    IncDec,
    Assign,
    Go,
    Defer,
    Return,
    Branch,
    Block,
    If,
    Case,
    Switch,
    TypeSwitch,
    Comm,
    Select,
    For,
    Range,
}

#[test]
fn statement_set_basics() {
    let mut stmts = Statement::enum_set();
    assert!(stmts.is_empty());
    assert!(stmts.add(Statement::decl()));
    assert!(!stmts.is_empty());
    assert!(stmts.contains(Statement::decl()));
    assert!(!stmts.contains(Statement::select()));
    assert_eq!(stmts.len(), 1);
    assert!(stmts.add(Statement::select()));
    assert_eq!(stmts.len(), 2);
    assert!(stmts.contains(Statement::select()));
    assert!(!stmts.contains(Statement::r#for()));

    assert_eq!(stmts.to_string(), "[Decl,Select]");
    assert_eq!(serde_json::to_string(&stmts).unwrap(), r#"["Decl","Select"]"#);

    let mut same = Statement::enum_set();
    same.add(Statement::decl());
    assert!(!stmts.equals(&same));
    same.add(Statement::select());
    assert!(stmts.equals(&same));

    let mut copied = stmts.clone();
    assert!(stmts.equals(&copied));
    copied.add(Statement::r#if());
    assert!(copied.contains(Statement::r#if()));
    assert!(!stmts.contains(Statement::r#if()));
    assert!(!stmts.equals(&copied));
    assert_eq!(copied.len() - stmts.len(), 1);

    // Comm..=Range is four constants; Select is already present.
    assert_eq!(stmts.add_range(Statement::comm(), Statement::range()), 3);
    assert_eq!(stmts.len(), 5);

    let mut sub = Statement::enum_set();
    assert!(sub.add(Statement::decl()));
    assert_eq!(sub.add_range(Statement::select(), Statement::range()), 3);
    assert!(stmts.contains_all(&sub));

    let mut other = Statement::enum_set();
    other.add(Statement::decl());
    other.add(Statement::switch());
    assert!(!stmts.contains_all(&other));

    assert!(stmts.remove(Statement::decl()));
    assert!(!stmts.remove(Statement::branch()));
    assert!(!stmts.contains(Statement::decl()));
    assert_eq!(stmts.add_range(Statement::expr(), Statement::assign()), 4);
    // IncDec..=Go is three constants; Go was never added.
    assert_eq!(stmts.remove_range(Statement::inc_dec(), Statement::go()), 2);

    stmts.clear();
    assert!(!stmts.contains(Statement::select()));
    assert_eq!(stmts.len(), 0);
}

#[test]
fn contains_each_over_constants() {
    let mut stmts = Statement::enum_set();
    stmts.extend([Statement::r#if(), Statement::r#return(), Statement::block()]);

    assert!(stmts.contains_each([]));
    assert!(stmts.contains_each([Statement::block(), Statement::r#if()]));
    assert!(!stmts.contains_each([Statement::block(), Statement::case()]));
}

#[test]
fn iteration_is_ascending_and_stoppable() {
    let mut stmts = Statement::enum_set();
    stmts.extend([Statement::range(), Statement::decl(), Statement::go()]);

    let ordinals: Vec<usize> = stmts.iter().map(|s| s.ordinal()).collect();
    assert_eq!(ordinals, [0, 7, 19]);

    let mut first = None;
    stmts.each(|s| {
        first = Some(s);
        ControlFlow::Break(())
    });
    assert_eq!(first, Some(Statement::decl()));
}

#[test]
fn complement_covers_the_rest_of_the_family() {
    let mut control = Statement::enum_set();
    control.add_range(Statement::r#if(), Statement::range());

    let rest = control.complement();
    assert_eq!(rest.len(), Statement::size() - control.len());
    assert!(rest.contains(Statement::block()));
    assert!(!rest.contains(Statement::r#if()));

    let mut everything = control.clone();
    everything.union_with(&rest);
    assert_eq!(everything, EnumSet::all(Statement::registry()));
}

#[test]
fn shared_set_across_threads() {
    let shared = SharedEnumSet::new(Statement::registry());

    std::thread::scope(|s| {
        for chunk in Statement::values().chunks(5) {
            let shared = &shared;
            s.spawn(move || {
                for stmt in chunk {
                    shared.add(stmt);
                }
            });
        }
    });

    assert_eq!(shared.len(), 20);
    assert!(shared.equals(&EnumSet::all(Statement::registry())));
}

#[test]
fn packed_bytes_are_one_word() {
    let mut stmts = Statement::enum_set();
    stmts.add(Statement::decl());
    stmts.add(Statement::range());

    let bytes = stmts.to_bytes();
    assert_eq!(bytes, [1, 0, 0b1000, 0, 0, 0, 0, 0]);
    assert_eq!(EnumSet::from_bytes(Statement::registry(), &bytes).unwrap(), stmts);
}

// =============================================================================
// Model-based checks against BTreeSet
// =============================================================================

#[derive(Clone, Debug)]
struct Slot {
    identity: Identity,
}

impl EnumValue for Slot {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

const CAPACITY: usize = 150;

fn slots() -> Registry<Slot> {
    let mut registry = Registry::new("model::Slot");
    for i in 0..CAPACITY {
        registry.create(format!("Slot{i}"), |identity| Slot { identity });
    }
    registry
}

#[derive(Clone, Debug)]
enum Op {
    Add(usize),
    Remove(usize),
    AddRange(usize, usize),
    RemoveRange(usize, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CAPACITY).prop_map(Op::Add),
        (0..CAPACITY).prop_map(Op::Remove),
        (0..CAPACITY, 0..CAPACITY).prop_map(|(a, b)| Op::AddRange(a, b)),
        (0..CAPACITY, 0..CAPACITY).prop_map(|(a, b)| Op::RemoveRange(a, b)),
    ]
}

fn arb_members() -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0..CAPACITY, 0..CAPACITY)
}

fn set_of<'r>(registry: &'r Registry<Slot>, members: &BTreeSet<usize>) -> EnumSet<'r, Slot> {
    let mut set = EnumSet::new(registry);
    set.extend(members.iter().filter_map(|&o| registry.by_ordinal(o)));
    set
}

fn ordinals(set: &EnumSet<'_, Slot>) -> BTreeSet<usize> {
    set.iter().map(|s| s.ordinal()).collect()
}

proptest! {
    #[test]
    fn prop_updates_match_model(ops in prop::collection::vec(arb_op(), 0..64)) {
        let registry = slots();
        let at = |o: usize| &registry.as_slice()[o];
        let mut set = EnumSet::new(&registry);
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Add(o) => prop_assert_eq!(set.add(at(o)), model.insert(o)),
                Op::Remove(o) => prop_assert_eq!(set.remove(at(o)), model.remove(&o)),
                Op::AddRange(a, b) => {
                    let added = (a..=b).filter(|&o| model.insert(o)).count();
                    prop_assert_eq!(set.add_range(at(a), at(b)), added);
                }
                Op::RemoveRange(a, b) => {
                    let removed = (a..=b).filter(|o| model.remove(o)).count();
                    prop_assert_eq!(set.remove_range(at(a), at(b)), removed);
                }
            }
            prop_assert_eq!(set.len(), model.len());
        }
        prop_assert_eq!(ordinals(&set), model);
    }

    #[test]
    fn prop_algebra_matches_model(a in arb_members(), b in arb_members()) {
        let registry = slots();
        let (sa, sb) = (set_of(&registry, &a), set_of(&registry, &b));

        let mut union = sa.clone();
        union.union_with(&sb);
        prop_assert_eq!(ordinals(&union), &a | &b);

        let mut both = sa.clone();
        both.intersect_with(&sb);
        prop_assert_eq!(ordinals(&both), &a & &b);

        let mut only_a = sa.clone();
        only_a.difference_with(&sb);
        prop_assert_eq!(ordinals(&only_a), &a - &b);

        let rest: BTreeSet<usize> = (0..CAPACITY).filter(|o| !a.contains(o)).collect();
        prop_assert_eq!(ordinals(&sa.complement()), rest);

        prop_assert_eq!(sa.contains_all(&sb), b.is_subset(&a));
        prop_assert_eq!(sa == sb, a == b);
    }
}
