//! Capability traits shared by every enum constant and family.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::LookupError;
use crate::identity::{Identity, Ordinal};
use crate::registry::Registry;
use crate::set::EnumSet;

/// A value that embeds an [`Identity`].
///
/// Implementors only provide [`identity`](EnumValue::identity); everything else
/// is derived from it.
pub trait EnumValue {
    fn identity(&self) -> &Identity;

    #[inline]
    fn name(&self) -> &str {
        self.identity().name()
    }

    #[inline]
    fn ordinal(&self) -> Ordinal {
        self.identity().ordinal()
    }

    #[inline]
    fn type_tag(&self) -> &'static str {
        self.identity().type_tag()
    }

    /// True iff `other` has the same type tag and the same name.
    ///
    /// Works across families: two constants named `Created` in different
    /// families are never equal.
    #[inline]
    fn equals(&self, other: &dyn EnumValue) -> bool {
        self.identity() == other.identity()
    }

    /// Declaration-order comparison by ordinal.
    ///
    /// Only meaningful within one family; comparing across families is not
    /// guarded against.
    #[inline]
    fn compare(&self, other: &dyn EnumValue) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

/// A declared enum family with a process-wide registry.
///
/// `TYPE_TAG` is the compile-time marker partitioning families. The
/// `enumeration!` macro implements this trait with a registry that is filled
/// exactly once, on first access.
///
/// ```ignore
/// use enum_family::prelude::*;
///
/// enumeration! {
///     pub struct Suit;
///     Clubs, Diamonds, Hearts, Spades,
/// }
///
/// assert_eq!(Suit::value_of("Hearts"), Some(Suit::hearts()));
/// assert_eq!(Suit::size(), 4);
/// ```
pub trait EnumFamily: EnumValue + Sized + Send + Sync + 'static {
    const TYPE_TAG: &'static str;

    fn registry() -> &'static Registry<Self>;

    /// All constants in ordinal order.
    #[inline]
    fn values() -> &'static [Self] {
        Self::registry().as_slice()
    }

    #[inline]
    fn size() -> usize {
        Self::registry().len()
    }

    #[inline]
    fn value_of(name: &str) -> Option<&'static Self> {
        Self::registry().value_of(name)
    }

    /// Linear scan; slower than [`value_of`](EnumFamily::value_of).
    #[inline]
    fn value_of_ignore_case(name: &str) -> Option<&'static Self> {
        Self::registry().value_of_ignore_case(name)
    }

    #[inline]
    fn resolve(name: &str) -> Result<&'static Self, LookupError> {
        Self::registry().resolve(name)
    }

    #[inline]
    fn by_ordinal(ordinal: Ordinal) -> Option<&'static Self> {
        Self::registry().by_ordinal(ordinal)
    }

    fn get_many<I>(names: I) -> Result<Vec<&'static Self>, LookupError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::registry().get_many(names)
    }

    #[inline]
    fn is_valid(name: &str) -> bool {
        Self::registry().is_valid(name)
    }

    fn as_map() -> HashMap<&'static str, &'static Self> {
        Self::registry().as_map()
    }

    /// Names of `enums`, or of the whole family when `enums` is empty.
    fn names_of<'a>(enums: &[&'a Self]) -> Vec<&'a str> {
        Self::registry().names_of(enums)
    }

    /// Empty bitset sized to the current population.
    fn enum_set() -> EnumSet<'static, Self> {
        EnumSet::new(Self::registry())
    }
}
