//! Basic family declaration and lookup.
//!
//! Run with: cargo run --example colors

use enum_family::prelude::*;

enumeration! {
    pub struct Color;
    Red,
    Yellow,
    Green,
    Blue,
}

fn main() {
    println!("=== Colors ===\n");

    for color in Color::values() {
        println!("  {:>6} ordinal={} tag={}", color.name(), color.ordinal(), color.type_tag());
    }

    for name in ["Green", "green", "Purple"] {
        match Color::value_of(name) {
            Some(c) => println!("  value_of({name:?}) = {c}"),
            None => match Color::value_of_ignore_case(name) {
                Some(c) => println!("  value_of({name:?}) missed, ignoring case: {c}"),
                None => println!("  {}", Color::resolve(name).unwrap_err()),
            },
        }
    }

    let warm = Color::get_many(["Red", "Yellow"]).expect("declared above");
    println!("\n  warm colors: {:?}", Color::names_of(&warm));
    println!("  red < blue: {}", Color::red() < Color::blue());
}
