//! Identity record embedded in every enum constant.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Zero-based position of a constant within its family, in declaration order.
pub type Ordinal = usize;

/// The immutable `(name, type tag, ordinal)` triple of one enum constant.
///
/// Identities are minted only by [`Registry`](crate::Registry) while a constant
/// is being declared; there is no public constructor. Two identities are equal
/// when they share the type tag and the name. The ordinal follows from those
/// two inside a single registry and takes no part in equality.
#[derive(Clone, Debug)]
pub struct Identity {
    name: Arc<str>,
    type_tag: &'static str,
    ordinal: Ordinal,
}

impl Identity {
    pub(crate) fn new(name: Arc<str>, type_tag: &'static str, ordinal: Ordinal) -> Self {
        Self {
            name,
            type_tag,
            ordinal,
        }
    }

    /// Constant name, unique within its family.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family partition key.
    #[inline]
    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    #[inline]
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    /// Exact match on all three components, ordinal included.
    pub(crate) fn is_same_slot(&self, other: &Identity) -> bool {
        self == other && self.ordinal == other.ordinal
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.type_tag == other.type_tag && self.name == other.name
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_tag.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
