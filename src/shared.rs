//! Lock-guarded enum set for concurrent mutation.

use std::ops::ControlFlow;

use parking_lot::RwLock;

use crate::registry::Registry;
use crate::set::{EnumSet, MemberSet};
use crate::traits::EnumValue;

/// An [`EnumSet`] behind a read-write lock, mutable through `&self`.
///
/// A plain `EnumSet` needs `&mut` for every update. Wrap it in this type when
/// several threads update the same set. Reads take the lock recursively, so
/// comparing a shared set against itself does not deadlock.
///
/// The backing words never leave the lock, so subset tests against a shared
/// set go through member iteration instead of the word-wise path.
pub struct SharedEnumSet<'r, E> {
    inner: RwLock<EnumSet<'r, E>>,
}

impl<'r, E: EnumValue> SharedEnumSet<'r, E> {
    pub fn new(registry: &'r Registry<E>) -> Self {
        Self::from(EnumSet::new(registry))
    }

    pub fn add(&self, e: &E) -> bool {
        self.inner.write().add(e)
    }

    pub fn add_range(&self, begin: &E, end: &E) -> usize {
        self.inner.write().add_range(begin, end)
    }

    pub fn remove(&self, e: &E) -> bool {
        self.inner.write().remove(e)
    }

    pub fn remove_range(&self, begin: &E, end: &E) -> usize {
        self.inner.write().remove_range(begin, end)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn contains(&self, e: &E) -> bool {
        self.inner.read_recursive().contains(e)
    }

    pub fn contains_each<'a, I>(&self, enums: I) -> bool
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        self.inner.read_recursive().contains_each(enums)
    }

    pub fn contains_all(&self, other: &dyn MemberSet<E>) -> bool {
        MemberSet::contains_all(self, other)
    }

    pub fn equals(&self, other: &dyn MemberSet<E>) -> bool {
        MemberSet::equals(self, other)
    }

    pub fn len(&self) -> usize {
        self.inner.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read_recursive().is_empty()
    }

    pub fn names(&self) -> Vec<&'r str> {
        self.inner.read_recursive().names()
    }

    /// Point-in-time copy of the current members.
    pub fn snapshot(&self) -> EnumSet<'r, E> {
        self.inner.read_recursive().clone()
    }

    pub fn into_inner(self) -> EnumSet<'r, E> {
        self.inner.into_inner()
    }
}

impl<'r, E> From<EnumSet<'r, E>> for SharedEnumSet<'r, E> {
    fn from(set: EnumSet<'r, E>) -> Self {
        Self {
            inner: RwLock::new(set),
        }
    }
}

impl<E: EnumValue> MemberSet<E> for SharedEnumSet<'_, E> {
    fn contains(&self, e: &E) -> bool {
        self.inner.read_recursive().contains(e)
    }

    /// Visits a snapshot of the members, so `visit` may update
    /// this same set without waiting on its own read guard.
    fn each(&self, visit: &mut dyn FnMut(&E) -> ControlFlow<()>) {
        self.snapshot().each(|e| visit(e));
    }
}
