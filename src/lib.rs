//! # Enum Families (enum-family)
//!
//! Declares families of singleton constants, each carrying a unique name, an
//! ordinal assigned in declaration order, and arbitrary payload fields.
//! Families support lookup by name, ordinal-ordered iteration, comparisons,
//! and packed bitset membership.
//!
//! ## Design
//!
//! Every constant embeds an [`Identity`]:
//!
//! ```text
//! ┌──────────────┬─────────────────────────┬─────────┐
//! │ name         │ type tag                │ ordinal │
//! │ "Hearts"     │ "cards::Suit"           │ 2       │
//! └──────────────┴─────────────────────────┴─────────┘
//! ```
//!
//! Each family owns one [`Registry`]. The registry is the factory that mints
//! identities and the index behind every lookup. The [`enumeration!`] macro
//! declares a family whose registry is built exactly once, on first use:
//!
//! ```ignore
//! use enum_family::prelude::*;
//!
//! enumeration! {
//!     pub struct Suit;
//!     Clubs, Diamonds, Hearts, Spades,
//! }
//!
//! assert_eq!(Suit::hearts().ordinal(), 2);
//! assert_eq!(Suit::value_of("Hearts"), Some(Suit::hearts()));
//!
//! let mut reds = Suit::enum_set();
//! reds.add(Suit::hearts());
//! reds.add(Suit::diamonds());
//! assert_eq!(reds.to_string(), "[Diamonds,Hearts]");
//! ```
//!
//! Registries can also be built by hand, which keeps tests isolated from any
//! process-wide state:
//!
//! ```ignore
//! let mut registry = Registry::new("cards::Suit");
//! registry.create("Clubs", |identity| Suit { identity });
//! ```

// Lets `enumeration!` expand to `::enum_family::...` inside this crate too.
extern crate self as enum_family;

pub mod catalog;
pub mod error;
pub mod identity;
pub mod layout;
pub mod registry;
pub mod serde_support;
pub mod set;
pub mod shared;
pub mod traits;

pub use catalog::{Catalog, FamilyInfo};
pub use enum_family_macro::enumeration;
pub use error::{LookupError, RegistryError};
pub use identity::{Identity, Ordinal};
pub use registry::Registry;
pub use serde_support::{FamilySeed, SetSeed};
pub use set::{EnumSet, MemberSet};
pub use shared::SharedEnumSet;
pub use traits::{EnumFamily, EnumValue};

/// Everything needed to declare and use families.
pub mod prelude {
    pub use crate::{enumeration, EnumFamily, EnumSet, EnumValue, MemberSet, Registry};
}

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
