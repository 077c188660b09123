//! Bitset operations over a larger family.
//!
//! Run with: cargo run --example statement_set

use enum_family::prelude::*;

enumeration! {
    pub struct Statement;
    Decl, Empty, Labeled, Expr, Send, IncDec, Assign, Go, Defer, Return,
    Branch, Block, If, Case, Switch, TypeSwitch, Comm, Select, For, Range,
}

fn main() {
    println!("=== Statement sets ===\n");

    let mut control = Statement::enum_set();
    let added = control.add_range(Statement::r#if(), Statement::type_switch());
    control.add(Statement::r#for());
    println!("  control flow ({added} from range): {control}");

    let mut simple = Statement::enum_set();
    simple.add_range(Statement::empty(), Statement::assign());
    println!("  simple: {simple}");

    let mut other = control.clone();
    other.union_with(&simple);
    let other = other.complement();
    println!("  everything else: {other}");

    println!("\n  packed: {:02x?}", control.to_bytes());
    println!("  json:   {}", serde_json::to_string(&control).expect("names serialize"));
}
