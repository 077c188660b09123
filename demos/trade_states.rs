//! Constants with a defaulted field, and two families sharing names.
//!
//! Run with: cargo run --example trade_states

use enum_family::prelude::*;
use enum_family::Catalog;

enumeration! {
    /// Forward lifecycle of a trade.
    pub struct TradeState {
        pub final_state: bool = false,
    }
    Created,
    Failed { final_state: true },
    Paid,
    Shipped,
    Delivered { final_state: true },
}

enumeration! {
    /// Lifecycle of a refund.
    pub struct ReverseState {
        pub final_state: bool = false,
    }
    Created,
    Failed { final_state: true },
    Refunded { final_state: true },
}

fn main() {
    println!("=== Trade states ===\n");

    for state in TradeState::values() {
        let marker = if state.final_state { " (final)" } else { "" };
        println!("  {}{marker}", state.name());
    }

    let trade = TradeState::created();
    let reverse = ReverseState::created();
    println!("\n  same name: {}", trade.name() == reverse.name());
    println!("  equal:     {}", trade.equals(reverse));
    println!("  refund final: {}", ReverseState::refunded().final_state);

    let catalog = Catalog::new()
        .with::<TradeState>()
        .and_then(|c| c.with::<ReverseState>())
        .expect("distinct type tags");
    println!("\n  families declaring `Failed`:");
    for tag in catalog.type_tags_named("Failed") {
        println!("    {tag}");
    }
}
