//! Packed bitset over the ordinals of one family.
//!
//! An [`EnumSet`] borrows the [`Registry`] it was sized from. Its capacity is
//! the registry population at construction time, and since the registry
//! cannot gain constants while it is borrowed, every constant of that
//! registry fits.

use std::fmt;
use std::ops::ControlFlow;

use serde::{Serialize, Serializer};
use zerocopy::little_endian::U64;
use zerocopy::{FromBytes, IntoBytes};

use crate::error::RegistryError;
use crate::identity::Ordinal;
use crate::layout::{bit_of, range_masks, tail_mask, word_count, word_index, WORD_BITS};
use crate::registry::Registry;
use crate::traits::EnumValue;

/// Read-only membership view over constants of one family.
///
/// Implementors that expose their backing words through
/// [`packed_words`](MemberSet::packed_words) get word-wise subset tests
/// against each other; everything else falls back to visiting members.
pub trait MemberSet<E: EnumValue> {
    fn contains(&self, e: &E) -> bool;

    /// Visit members in ascending ordinal order until `visit` breaks.
    fn each(&self, visit: &mut dyn FnMut(&E) -> ControlFlow<()>);

    /// Backing words, when the set is a packed bitset.
    fn packed_words(&self) -> Option<&[u64]> {
        None
    }

    /// Subset test: does `self` contain every member of `other`?
    fn contains_all(&self, other: &dyn MemberSet<E>) -> bool {
        if let (Some(mine), Some(theirs)) = (self.packed_words(), other.packed_words()) {
            return theirs
                .iter()
                .enumerate()
                .all(|(i, &w)| w & mine.get(i).copied().unwrap_or(0) == w);
        }
        let mut all = true;
        other.each(&mut |e| {
            if self.contains(e) {
                ControlFlow::Continue(())
            } else {
                all = false;
                ControlFlow::Break(())
            }
        });
        all
    }

    /// Same members in both directions.
    fn equals(&self, other: &dyn MemberSet<E>) -> bool
    where
        Self: Sized,
    {
        self.contains_all(other) && other.contains_all(self)
    }
}

/// Fixed-capacity set of constants of one family, one bit per ordinal.
///
/// Membership tests and single updates are O(1); whole-set operations are
/// O(capacity / 64). Iteration walks the registry and tests each constant, so
/// it is O(capacity).
///
/// # Panics
///
/// Adding or removing a constant whose ordinal is not below
/// [`capacity`](EnumSet::capacity) panics. That only happens with a constant
/// from a different registry of the same type; create sets after all
/// constants of the family are declared.
pub struct EnumSet<'r, E> {
    registry: &'r Registry<E>,
    capacity: usize,
    words: Vec<u64>,
    len: usize,
}

impl<'r, E: EnumValue> EnumSet<'r, E> {
    /// Empty set sized to the current population of `registry`.
    pub fn new(registry: &'r Registry<E>) -> Self {
        let capacity = registry.len();
        Self {
            registry,
            capacity,
            words: vec![0; word_count(capacity)],
            len: 0,
        }
    }

    /// Set holding every constant of `registry`.
    pub fn all(registry: &'r Registry<E>) -> Self {
        let mut set = Self::new(registry);
        set.words.fill(u64::MAX);
        set.trim_tail();
        set.len = set.capacity;
        set
    }

    /// Decode a set from [`to_bytes`](EnumSet::to_bytes) output.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::BitsetLength`] if `bytes` is not exactly
    ///   `8 * ceil(capacity / 64)` long
    /// - [`RegistryError::BitsetOverflow`] if a bit past the capacity is set
    pub fn from_bytes(registry: &'r Registry<E>, bytes: &[u8]) -> Result<Self, RegistryError> {
        let mut set = Self::new(registry);
        let expected = set.words.len() * size_of::<u64>();
        let length_error = || RegistryError::BitsetLength {
            type_tag: registry.type_tag(),
            expected,
            found: bytes.len(),
        };
        if bytes.len() != expected {
            return Err(length_error());
        }
        let packed = <[U64]>::ref_from_bytes(bytes).map_err(|_| length_error())?;
        for (word, p) in set.words.iter_mut().zip(packed) {
            *word = p.get();
        }

        if let Some(last) = set.words.last() {
            let overflow = last & !tail_mask(set.capacity);
            if overflow != 0 {
                return Err(RegistryError::BitsetOverflow {
                    type_tag: registry.type_tag(),
                    ordinal: (set.words.len() - 1) * WORD_BITS + overflow.trailing_zeros() as usize,
                    capacity: set.capacity,
                });
            }
        }
        set.recount();
        Ok(set)
    }

    /// Little-endian packed words, 8 bytes per 64 ordinals.
    pub fn to_bytes(&self) -> Vec<u8> {
        let packed: Vec<U64> = self.words.iter().map(|&w| U64::new(w)).collect();
        packed.as_bytes().to_vec()
    }

    #[inline]
    pub fn registry(&self) -> &'r Registry<E> {
        self.registry
    }

    /// Number of ordinals this set can represent.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
        self.len = 0;
    }

    /// Insert `e`. Returns `true` if it was not already a member.
    pub fn add(&mut self, e: &E) -> bool {
        let ordinal = self.checked(e);
        let (word, bit) = (word_index(ordinal), bit_of(ordinal));
        let added = self.words[word] & bit == 0;
        if added {
            self.words[word] |= bit;
            self.len += 1;
        }
        added
    }

    /// Insert every constant with an ordinal in `begin..=end`.
    ///
    /// Returns the number of constants that were not already members. An
    /// inverted range (`begin` after `end`) is a no-op returning 0.
    pub fn add_range(&mut self, begin: &E, end: &E) -> usize {
        let Some((lo, hi)) = self.checked_range(begin, end) else {
            return 0;
        };
        let mut added = 0;
        for (word, mask) in range_masks(lo, hi) {
            added += (mask & !self.words[word]).count_ones() as usize;
            self.words[word] |= mask;
        }
        self.len += added;
        added
    }

    /// Remove `e`. Returns `true` if it was a member.
    pub fn remove(&mut self, e: &E) -> bool {
        let ordinal = self.checked(e);
        let (word, bit) = (word_index(ordinal), bit_of(ordinal));
        let removed = self.words[word] & bit != 0;
        if removed {
            self.words[word] &= !bit;
            self.len -= 1;
        }
        removed
    }

    /// Remove every constant with an ordinal in `begin..=end`.
    ///
    /// Returns the number of constants that were members. An inverted range
    /// is a no-op returning 0.
    pub fn remove_range(&mut self, begin: &E, end: &E) -> usize {
        let Some((lo, hi)) = self.checked_range(begin, end) else {
            return 0;
        };
        let mut removed = 0;
        for (word, mask) in range_masks(lo, hi) {
            removed += (mask & self.words[word]).count_ones() as usize;
            self.words[word] &= !mask;
        }
        self.len -= removed;
        removed
    }

    /// Is `e` a member? Constants past the capacity never are.
    #[inline]
    pub fn contains(&self, e: &E) -> bool {
        self.test(e.ordinal())
    }

    /// True iff every given constant is a member; vacuously true for none.
    pub fn contains_each<'a, I>(&self, enums: I) -> bool
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        enums.into_iter().all(|e| self.contains(e))
    }

    /// Subset test; word-wise when `other` is also a packed set.
    pub fn contains_all(&self, other: &dyn MemberSet<E>) -> bool {
        MemberSet::contains_all(self, other)
    }

    pub fn equals(&self, other: &dyn MemberSet<E>) -> bool {
        MemberSet::equals(self, other)
    }

    /// Visit members in ascending ordinal order until `visit` breaks.
    pub fn each(&self, mut visit: impl FnMut(&'r E) -> ControlFlow<()>) {
        for e in self.iter() {
            if visit(e).is_break() {
                break;
            }
        }
    }

    /// Members in ascending ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &'r E> + '_ {
        self.registry
            .iter()
            .take(self.capacity)
            .filter(move |e| self.test(e.ordinal()))
    }

    /// Member names in ordinal order.
    pub fn names(&self) -> Vec<&'r str> {
        let mut names = Vec::with_capacity(self.len);
        self.each(|e| {
            names.push(e.name());
            ControlFlow::Continue(())
        });
        names
    }

    /// Add every member of `other`.
    pub fn union_with(&mut self, other: &EnumSet<'_, E>) {
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
        self.trim_tail();
        self.recount();
    }

    /// Keep only members also in `other`.
    pub fn intersect_with(&mut self, other: &EnumSet<'_, E>) {
        let shared = other.words.len().min(self.words.len());
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine &= theirs;
        }
        self.words[shared..].fill(0);
        self.recount();
    }

    /// Drop every member of `other`.
    pub fn difference_with(&mut self, other: &EnumSet<'_, E>) {
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine &= !theirs;
        }
        self.recount();
    }

    /// Constants of the family that are not members.
    pub fn complement(&self) -> Self {
        let mut set = self.clone();
        for word in &mut set.words {
            *word = !*word;
        }
        set.trim_tail();
        set.len = set.capacity - self.len;
        set
    }

    #[inline]
    fn test(&self, ordinal: Ordinal) -> bool {
        ordinal < self.capacity && self.words[word_index(ordinal)] & bit_of(ordinal) != 0
    }

    fn checked(&self, e: &E) -> Ordinal {
        let ordinal = e.ordinal();
        assert!(
            ordinal < self.capacity,
            "`{}` (ordinal {ordinal}) is outside the capacity {} of this `{}` set; \
             declare every constant before creating sets",
            e.name(),
            self.capacity,
            self.registry.type_tag(),
        );
        ordinal
    }

    fn checked_range(&self, begin: &E, end: &E) -> Option<(Ordinal, Ordinal)> {
        if begin.ordinal() > end.ordinal() {
            return None;
        }
        Some((self.checked(begin), self.checked(end)))
    }

    fn trim_tail(&mut self) {
        let tail = tail_mask(self.capacity);
        if let Some(last) = self.words.last_mut() {
            *last &= tail;
        }
    }

    fn recount(&mut self) {
        self.len = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }
}

impl<E: EnumValue> MemberSet<E> for EnumSet<'_, E> {
    fn contains(&self, e: &E) -> bool {
        self.test(e.ordinal())
    }

    fn each(&self, visit: &mut dyn FnMut(&E) -> ControlFlow<()>) {
        for e in self.iter() {
            if visit(e).is_break() {
                break;
            }
        }
    }

    fn packed_words(&self) -> Option<&[u64]> {
        Some(&self.words)
    }
}

impl<E> Clone for EnumSet<'_, E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry,
            capacity: self.capacity,
            words: self.words.clone(),
            len: self.len,
        }
    }
}

impl<E: EnumValue> PartialEq for EnumSet<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<E: EnumValue> Eq for EnumSet<'_, E> {}

impl<'a, E: EnumValue + 'a> Extend<&'a E> for EnumSet<'_, E> {
    fn extend<T: IntoIterator<Item = &'a E>>(&mut self, iter: T) {
        for e in iter {
            self.add(e);
        }
    }
}

impl<E: EnumValue> fmt::Display for EnumSet<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(","))
    }
}

impl<E: EnumValue> fmt::Debug for EnumSet<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumSet")
            .field("type_tag", &self.registry.type_tag())
            .field("capacity", &self.capacity)
            .field("members", &self.names())
            .finish()
    }
}

impl<E: EnumValue> Serialize for EnumSet<'_, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|e| e.name()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    #[derive(Clone, Debug)]
    struct Stmt {
        identity: Identity,
    }

    impl EnumValue for Stmt {
        fn identity(&self) -> &Identity {
            &self.identity
        }
    }

    fn family(count: usize) -> Registry<Stmt> {
        let mut reg = Registry::new("ast::Stmt");
        for i in 0..count {
            reg.create(format!("S{i}"), |identity| Stmt { identity });
        }
        reg
    }

    fn at(reg: &Registry<Stmt>, ordinal: usize) -> &Stmt {
        reg.by_ordinal(ordinal).unwrap()
    }

    #[test]
    fn new_set_is_empty_and_sized() {
        let reg = family(130);
        let set = EnumSet::new(&reg);

        assert!(set.is_empty());
        assert_eq!(set.capacity(), 130);
        assert_eq!(set.words.len(), 3);
    }

    #[test]
    fn add_is_idempotent() {
        let reg = family(4);
        let mut set = EnumSet::new(&reg);

        assert!(set.add(at(&reg, 2)));
        assert_eq!(set.len(), 1);
        assert!(!set.add(at(&reg, 2)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.names(), vec!["S2"]);
    }

    #[test]
    fn add_then_remove_restores() {
        let reg = family(70);
        let mut set = EnumSet::new(&reg);
        let e = at(&reg, 66);

        assert!(set.add(e));
        assert!(set.contains(e));
        assert!(set.remove(e));
        assert!(!set.contains(e));
        assert!(!set.remove(e));
        assert!(set.is_empty());
    }

    #[test]
    fn add_range_counts_only_new_members() {
        let reg = family(4);
        let mut set = EnumSet::new(&reg);

        set.add(at(&reg, 2));
        assert_eq!(set.add_range(at(&reg, 0), at(&reg, 3)), 3);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn ranges_cross_word_boundaries() {
        let reg = family(200);
        let mut set = EnumSet::new(&reg);

        assert_eq!(set.add_range(at(&reg, 60), at(&reg, 140)), 81);
        assert_eq!(set.len(), 81);
        assert!(set.contains(at(&reg, 60)));
        assert!(set.contains(at(&reg, 127)));
        assert!(set.contains(at(&reg, 140)));
        assert!(!set.contains(at(&reg, 59)));
        assert!(!set.contains(at(&reg, 141)));

        assert_eq!(set.remove_range(at(&reg, 100), at(&reg, 199)), 41);
        assert_eq!(set.len(), 40);
    }

    #[test]
    fn inverted_range_is_noop() {
        let reg = family(10);
        let mut set = EnumSet::new(&reg);

        assert_eq!(set.add_range(at(&reg, 7), at(&reg, 3)), 0);
        assert!(set.is_empty());
        set.add(at(&reg, 5));
        assert_eq!(set.remove_range(at(&reg, 7), at(&reg, 3)), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn contains_each_is_vacuously_true() {
        let reg = family(3);
        let mut set = EnumSet::new(&reg);

        assert!(set.contains_each([]));
        set.add(at(&reg, 0));
        assert!(set.contains_each([at(&reg, 0)]));
        assert!(!set.contains_each([at(&reg, 0), at(&reg, 1)]));
    }

    #[test]
    fn subset_and_equality() {
        let reg = family(100);
        let mut a = EnumSet::new(&reg);
        let mut b = EnumSet::new(&reg);

        a.add_range(at(&reg, 10), at(&reg, 80));
        b.add(at(&reg, 10));
        b.add(at(&reg, 70));

        assert!(a.contains_all(&b));
        assert!(!b.contains_all(&a));
        assert!(!a.equals(&b));

        b.add_range(at(&reg, 10), at(&reg, 80));
        assert!(a.equals(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn clone_is_independent() {
        let reg = family(5);
        let mut original = EnumSet::new(&reg);
        original.add(at(&reg, 1));

        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.add(at(&reg, 4));
        assert!(copy.contains(at(&reg, 4)));
        assert!(!original.contains(at(&reg, 4)));
        assert_ne!(copy, original);
    }

    #[test]
    fn each_stops_early() {
        let reg = family(10);
        let mut set = EnumSet::new(&reg);
        set.add_range(at(&reg, 2), at(&reg, 8));

        let mut seen = Vec::new();
        set.each(|e| {
            seen.push(e.ordinal());
            if seen.len() == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, vec![2, 3, 4]);
    }

    #[test]
    fn all_and_complement() {
        let reg = family(67);
        let full = EnumSet::all(&reg);
        assert_eq!(full.len(), 67);
        assert_eq!(full.words[1], 0b111);

        let mut some = EnumSet::new(&reg);
        some.add_range(at(&reg, 0), at(&reg, 9));
        let rest = some.complement();
        assert_eq!(rest.len(), 57);
        assert!(!rest.contains(at(&reg, 9)));
        assert!(rest.contains(at(&reg, 66)));
        assert_eq!(rest.words[1], 0b111);
    }

    #[test]
    fn set_algebra() {
        let reg = family(8);
        let mut a = EnumSet::new(&reg);
        let mut b = EnumSet::new(&reg);
        a.add_range(at(&reg, 0), at(&reg, 4));
        b.add_range(at(&reg, 3), at(&reg, 7));

        let mut union = a.clone();
        union.union_with(&b);
        assert_eq!(union.len(), 8);

        let mut both = a.clone();
        both.intersect_with(&b);
        assert_eq!(both.names(), vec!["S3", "S4"]);

        let mut only_a = a.clone();
        only_a.difference_with(&b);
        assert_eq!(only_a.names(), vec!["S0", "S1", "S2"]);
    }

    #[test]
    fn clear_empties() {
        let reg = family(8);
        let mut set = EnumSet::all(&reg);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(at(&reg, 0)));
    }

    #[test]
    fn display_and_debug() {
        let reg = family(4);
        let mut set = EnumSet::new(&reg);
        set.add(at(&reg, 3));
        set.add(at(&reg, 0));

        assert_eq!(set.to_string(), "[S0,S3]");
        assert!(format!("{set:?}").contains("ast::Stmt"));
    }

    #[test]
    fn bytes_round_trip() {
        let reg = family(70);
        let mut set = EnumSet::new(&reg);
        set.add(at(&reg, 0));
        set.add(at(&reg, 65));

        let bytes = set.to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[8], 0b10);

        let decoded = EnumSet::from_bytes(&reg, &bytes).unwrap();
        assert_eq!(decoded, set);
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn from_bytes_rejects_bad_input() {
        let reg = family(70);

        let err = EnumSet::from_bytes(&reg, &[0; 8]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::BitsetLength {
                type_tag: "ast::Stmt",
                expected: 16,
                found: 8,
            }
        );

        let mut bytes = vec![0u8; 16];
        bytes[8] = 0b1000_0000; // ordinal 71
        let err = EnumSet::from_bytes(&reg, &bytes).unwrap_err();
        assert_eq!(
            err,
            RegistryError::BitsetOverflow {
                type_tag: "ast::Stmt",
                ordinal: 71,
                capacity: 70,
            }
        );
    }

    #[test]
    #[should_panic(expected = "outside the capacity 2")]
    fn foreign_constant_past_capacity_panics() {
        let small = family(2);
        let large = family(5);
        let mut set = EnumSet::new(&small);
        set.add(at(&large, 4));
    }

    #[test]
    fn foreign_constant_past_capacity_is_not_contained() {
        let small = family(2);
        let large = family(5);
        let set = EnumSet::all(&small);
        assert!(!set.contains(at(&large, 4)));
    }
}
