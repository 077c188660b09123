//! Family registry: constant declaration and name/ordinal lookup.

use std::collections::HashMap;
use std::sync::Arc;

use unicase::UniCase;

use crate::error::{LookupError, RegistryError};
use crate::identity::{Identity, Ordinal};
use crate::traits::{EnumFamily, EnumValue};

/// Registry for one enum family.
///
/// Provides:
/// - Declaration of constants with ordinals assigned in call order
/// - Exact, case-insensitive and batch lookup by name
/// - Ordinal-ordered iteration
///
/// Entries are append-only: the position of a constant in `entries` is its
/// ordinal, so ordinals are always `0..len` with no gaps. Declaring needs
/// `&mut self` and lookups need `&self`, so once a registry is shared it is
/// frozen for as long as the borrow lasts.
#[derive(Clone, Debug)]
pub struct Registry<E> {
    type_tag: &'static str,
    entries: Vec<E>,
    name_to_idx: HashMap<Arc<str>, usize>,
}

impl<E: EnumFamily> Default for Registry<E> {
    fn default() -> Self {
        Self::new(E::TYPE_TAG)
    }
}

impl<E: EnumValue> Registry<E> {
    pub fn new(type_tag: &'static str) -> Self {
        Self {
            type_tag,
            entries: Vec::new(),
            name_to_idx: HashMap::new(),
        }
    }

    #[inline]
    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    /// Declare a new constant.
    ///
    /// `build` receives the freshly minted [`Identity`] and must return an
    /// instance embedding it, with any domain fields already filled in. The
    /// ordinal is the current population.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateName`] if `name` is already declared
    /// - [`RegistryError::IdentityMismatch`] if `build` returned an instance
    ///   carrying some other identity
    ///
    /// The registry is unchanged on error.
    pub fn try_create(
        &mut self,
        name: impl Into<Arc<str>>,
        build: impl FnOnce(Identity) -> E,
    ) -> Result<&E, RegistryError> {
        let name = name.into();
        if let Some(&ordinal) = self.name_to_idx.get(&*name) {
            return Err(RegistryError::DuplicateName {
                type_tag: self.type_tag,
                name: name.to_string(),
                ordinal,
            });
        }

        let ordinal = self.entries.len();
        let identity = Identity::new(name.clone(), self.type_tag, ordinal);
        let entry = build(identity.clone());
        if !entry.identity().is_same_slot(&identity) {
            return Err(RegistryError::IdentityMismatch {
                type_tag: self.type_tag,
                name: name.to_string(),
                found: format!("{}::{}#{}", entry.type_tag(), entry.name(), entry.ordinal()),
            });
        }

        tracing::debug!(type_tag = self.type_tag, name = %name, ordinal, "declared enum constant");
        self.name_to_idx.insert(name, ordinal);
        self.entries.push(entry);
        Ok(&self.entries[ordinal])
    }

    /// Declare a new constant, panicking on a broken declaration.
    ///
    /// # Panics
    ///
    /// On any error [`try_create`](Registry::try_create) would return.
    /// Declaring the same name twice is a programming error, not a runtime
    /// condition.
    pub fn create(&mut self, name: impl Into<Arc<str>>, build: impl FnOnce(Identity) -> E) -> &E {
        let type_tag = self.type_tag;
        match self.try_create(name, build) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::error!(type_tag, error = %err, "invalid enum declaration");
                panic!("{err}");
            }
        }
    }

    /// Name → constant (exact, case-sensitive).
    #[inline]
    pub fn value_of(&self, name: &str) -> Option<&E> {
        self.name_to_idx.get(name).map(|&i| &self.entries[i])
    }

    /// Case-insensitive lookup.
    ///
    /// Scans every constant of the family; no folded index is kept, so this
    /// is linear in the population.
    pub fn value_of_ignore_case(&self, name: &str) -> Option<&E> {
        self.entries.iter().find(|e| eq_fold(e.name(), name))
    }

    /// [`value_of`](Registry::value_of) with a descriptive error.
    pub fn resolve(&self, name: &str) -> Result<&E, LookupError> {
        self.value_of(name).ok_or_else(|| {
            tracing::trace!(type_tag = self.type_tag, name, "enum constant lookup missed");
            LookupError::NotFound {
                type_tag: self.type_tag,
                name: name.to_owned(),
            }
        })
    }

    /// Ordinal → constant.
    #[inline]
    pub fn by_ordinal(&self, ordinal: Ordinal) -> Option<&E> {
        self.entries.get(ordinal)
    }

    /// Resolve every name or fail as a whole.
    ///
    /// # Errors
    ///
    /// [`LookupError::Missing`] listing each name that did not resolve.
    pub fn get_many<I>(&self, names: I) -> Result<Vec<&E>, LookupError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            let name = name.as_ref();
            match self.value_of(name) {
                Some(e) => found.push(e),
                None => missing.push(name.to_owned()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(LookupError::Missing {
                type_tag: self.type_tag,
                names: missing,
            })
        }
    }

    #[inline]
    pub fn is_valid(&self, name: &str) -> bool {
        self.name_to_idx.contains_key(name)
    }

    /// Total number of declared constants.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All constants in ordinal order.
    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// Snapshot copy of all constants in ordinal order.
    pub fn values(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.entries.clone()
    }

    /// Name → constant projection of the whole family.
    pub fn as_map(&self) -> HashMap<&str, &E> {
        self.entries.iter().map(|e| (e.name(), e)).collect()
    }

    /// Names of all constants in ordinal order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    /// Names of `enums` in the given order, or of the whole family when `enums` is empty.
    pub fn names_of<'a>(&'a self, enums: &[&'a E]) -> Vec<&'a str> {
        if enums.is_empty() {
            self.names()
        } else {
            enums.iter().map(|e| e.name()).collect()
        }
    }
}

impl<'a, E> IntoIterator for &'a Registry<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Case-insensitive equality under full Unicode case folding.
fn eq_fold(a: &str, b: &str) -> bool {
    UniCase::unicode(a) == UniCase::unicode(b)
}

// =============================================================================
// Tests
// =============================================================================
