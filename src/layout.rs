//! Word layout: ordinal to bit mapping for packed enum sets.
//!
//! Ordinal `o` lives in word `o >> 6` at bit `o % 64`. Low bits hold low
//! ordinals, so iterating words in order visits constants in declaration order.
//!
//! ```text
//! words[0]  high <── ordinal 63 ... ordinal 1, ordinal 0 ──> low
//! words[1]  high <── ordinal 127 ... ordinal 65, ordinal 64 ──> low
//! ...
//! ```

use crate::Ordinal;

/// Bits per backing word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// `ordinal >> WORD_SHIFT` selects the word.
pub const WORD_SHIFT: u32 = 6;

/// `ordinal & BIT_INDEX_MASK` selects the bit inside the word.
pub const BIT_INDEX_MASK: usize = WORD_BITS - 1;

/// Static assertion: the shift must agree with the word width.
const _: () = assert!(1 << WORD_SHIFT == WORD_BITS, "WORD_SHIFT must match WORD_BITS");

/// Number of words needed to hold `capacity` ordinals (`ceil(capacity / 64)`).
#[inline]
pub const fn word_count(capacity: usize) -> usize {
    (capacity + WORD_BITS - 1) >> WORD_SHIFT
}

/// Index of the word holding `ordinal`.
#[inline]
pub const fn word_index(ordinal: Ordinal) -> usize {
    ordinal >> WORD_SHIFT
}

/// Single-bit mask for `ordinal` within its word.
#[inline]
pub const fn bit_of(ordinal: Ordinal) -> u64 {
    1u64 << (ordinal & BIT_INDEX_MASK)
}

/// Inclusive mask of bits `lo..=hi` inside one word.
#[inline]
pub const fn span_mask(lo: usize, hi: usize) -> u64 {
    debug_assert!(lo <= hi && hi < WORD_BITS, "span must lie inside one word");
    (u64::MAX >> (BIT_INDEX_MASK - hi)) & (u64::MAX << lo)
}

/// Mask of the bits that are valid in the last word of a set with `capacity` ordinals.
///
/// Returns `u64::MAX` when the capacity is a multiple of 64 (and for 0, where
/// there is no last word to mask).
#[inline]
pub const fn tail_mask(capacity: usize) -> u64 {
    let used = capacity & BIT_INDEX_MASK;
    if used == 0 { u64::MAX } else { span_mask(0, used - 1) }
}

/// Per-word masks covering the inclusive ordinal range `begin..=end`.
///
/// Yields `(word_index, mask)` pairs, one per touched word. An inverted range
/// yields nothing.
pub fn range_masks(begin: Ordinal, end: Ordinal) -> impl Iterator<Item = (usize, u64)> {
    let (first, last) = (word_index(begin), word_index(end));
    let words = if begin > end { 0..0 } else { first..last + 1 };
    words.map(move |word| {
        let lo = if word == first { begin & BIT_INDEX_MASK } else { 0 };
        let hi = if word == last { end & BIT_INDEX_MASK } else { BIT_INDEX_MASK };
        (word, span_mask(lo, hi))
    })
}
