//! Catalog of several family registries indexed together.
//!
//! Families are independent: the same constant name may appear in any number
//! of them. The catalog keeps the cross-family view, name → type tags that
//! declare it, and finds a family by its type tag.

use std::collections::HashMap;

use crate::error::RegistryError;
use crate::identity::Ordinal;
use crate::registry::Registry;
use crate::traits::{EnumFamily, EnumValue};

/// Type-erased read access to one family registry.
pub trait FamilyInfo: Send + Sync {
    fn type_tag(&self) -> &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Constant names in ordinal order.
    fn names(&self) -> Vec<&str>;

    fn ordinal_of(&self, name: &str) -> Option<Ordinal>;
}

impl<E: EnumValue + Send + Sync> FamilyInfo for Registry<E> {
    fn type_tag(&self) -> &'static str {
        Registry::type_tag(self)
    }

    fn len(&self) -> usize {
        Registry::len(self)
    }

    fn names(&self) -> Vec<&str> {
        Registry::names(self)
    }

    fn ordinal_of(&self, name: &str) -> Option<Ordinal> {
        self.value_of(name).map(|e| e.ordinal())
    }
}

/// An explicitly owned set of family registries.
///
/// Build one at startup, or one per test, instead of sharing ambient global
/// maps. Registries are borrowed, so none of them can gain constants while the
/// catalog is alive and its name index stays accurate.
///
/// ```ignore
/// let catalog = Catalog::new().with::<pkga::Status>()?.with::<pkgb::State>()?;
/// assert_eq!(catalog.type_tags_named("Created").len(), 2);
/// ```
#[derive(Default)]
pub struct Catalog<'a> {
    families: Vec<&'a dyn FamilyInfo>,
    tag_to_idx: HashMap<&'static str, usize>,
    /// Constant name → type tags declaring it, in catalog insertion order.
    name_index: HashMap<String, Vec<&'static str>>,
}

impl<'a> Catalog<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateFamily`] if a registry with the same type tag
    /// is already present. The catalog is unchanged on error.
    pub fn insert(&mut self, family: &'a dyn FamilyInfo) -> Result<(), RegistryError> {
        let type_tag = family.type_tag();
        if self.tag_to_idx.contains_key(type_tag) {
            return Err(RegistryError::DuplicateFamily(type_tag));
        }

        for name in family.names() {
            self.name_index.entry(name.to_owned()).or_default().push(type_tag);
        }
        self.tag_to_idx.insert(type_tag, self.families.len());
        self.families.push(family);

        tracing::debug!(type_tag, constants = family.len(), "added family to catalog");
        Ok(())
    }

    /// Builder form of [`insert`](Catalog::insert) for a declared family.
    pub fn with<E: EnumFamily>(mut self) -> Result<Self, RegistryError> {
        self.insert(E::registry())?;
        Ok(self)
    }

    #[inline]
    pub fn family(&self, type_tag: &str) -> Option<&'a dyn FamilyInfo> {
        self.tag_to_idx.get(type_tag).map(|&i| self.families[i])
    }

    /// Families in insertion order.
    pub fn families(&self) -> impl Iterator<Item = &'a dyn FamilyInfo> + '_ {
        self.families.iter().copied()
    }

    /// Type tags of every family declaring a constant called `name`.
    pub fn type_tags_named(&self, name: &str) -> &[&'static str] {
        self.name_index.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ordinal of `name` within the family tagged `type_tag`.
    pub fn ordinal_of(&self, type_tag: &str, name: &str) -> Option<Ordinal> {
        self.family(type_tag)?.ordinal_of(name)
    }

    /// Number of families.
    #[inline]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Constants across all families.
    pub fn constant_count(&self) -> usize {
        self.families.iter().map(|f| f.len()).sum()
    }
}
