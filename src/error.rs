use thiserror::Error;

use crate::Ordinal;

/// Declaration-time and codec failures.
///
/// [`RegistryError::DuplicateName`] and [`RegistryError::IdentityMismatch`]
/// describe broken declarations: [`Registry::create`](crate::Registry::create)
/// turns them into a panic, [`Registry::try_create`](crate::Registry::try_create)
/// hands them back with the registry left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A constant with this name is already declared in the family.
    #[error("duplicate enum constant `{name}` in family `{type_tag}` (already declared as ordinal {ordinal})")]
    DuplicateName {
        type_tag: &'static str,
        name: String,
        ordinal: Ordinal,
    },
    /// The builder returned an instance that does not embed the identity it was handed.
    #[error("builder for `{name}` in family `{type_tag}` returned an instance carrying identity `{found}`")]
    IdentityMismatch {
        type_tag: &'static str,
        name: String,
        found: String,
    },
    /// Two registries with the same type tag were added to one catalog.
    #[error("family `{0}` is already present in the catalog")]
    DuplicateFamily(&'static str),
    /// A packed set does not have the byte length its family requires.
    #[error("packed set for family `{type_tag}` needs {expected} bytes, got {found}")]
    BitsetLength {
        type_tag: &'static str,
        expected: usize,
        found: usize,
    },
    /// A packed set has a bit set past the family population.
    #[error("packed set for family `{type_tag}` sets ordinal {ordinal} beyond capacity {capacity}")]
    BitsetOverflow {
        type_tag: &'static str,
        ordinal: Ordinal,
        capacity: usize,
    },
}

/// Recoverable lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("enum constant `{name}` not found in family `{type_tag}`")]
    NotFound { type_tag: &'static str, name: String },
    /// A batch lookup failed; lists every name that did not resolve.
    #[error("enum constants not found in family `{type_tag}`: {}", .names.join(", "))]
    Missing {
        type_tag: &'static str,
        names: Vec<String>,
    },
}
