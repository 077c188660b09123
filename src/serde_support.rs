//! serde glue: constants travel as their bare name.
//!
//! The `enumeration!` macro implements `Serialize`/`Deserialize` for declared
//! families through [`serialize`] and [`deserialize`]. Registries built at
//! runtime deserialize through [`FamilySeed`] and [`SetSeed`].

use std::fmt;

use serde::de::{self, DeserializeSeed, SeqAccess, Visitor};
use serde::{Deserializer, Serializer};

use crate::registry::Registry;
use crate::set::EnumSet;
use crate::traits::{EnumFamily, EnumValue};

/// Emit `value` as its name.
pub fn serialize<E, S>(value: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: EnumValue + ?Sized,
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

/// Read a name and resolve it in the family registry.
pub fn deserialize<'de, E, D>(deserializer: D) -> Result<E, D::Error>
where
    E: EnumFamily + Clone,
    D: Deserializer<'de>,
{
    FamilySeed::new(E::registry())
        .deserialize(deserializer)
        .cloned()
}

/// Deserializes a name into a constant of one registry.
pub struct FamilySeed<'r, E> {
    registry: &'r Registry<E>,
}

impl<'r, E> FamilySeed<'r, E> {
    pub fn new(registry: &'r Registry<E>) -> Self {
        Self { registry }
    }
}

impl<'de, 'r, E: EnumValue> DeserializeSeed<'de> for FamilySeed<'r, E> {
    type Value = &'r E;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_str(NameVisitor {
            registry: self.registry,
        })
    }
}

struct NameVisitor<'r, E> {
    registry: &'r Registry<E>,
}

impl<'de, 'r, E: EnumValue> Visitor<'de> for NameVisitor<'r, E> {
    type Value = &'r E;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the name of a `{}` constant", self.registry.type_tag())
    }

    fn visit_str<Error: de::Error>(self, v: &str) -> Result<Self::Value, Error> {
        self.registry.resolve(v).map_err(Error::custom)
    }
}

/// Deserializes a sequence of names into an [`EnumSet`] over one registry.
pub struct SetSeed<'r, E> {
    registry: &'r Registry<E>,
}

impl<'r, E> SetSeed<'r, E> {
    pub fn new(registry: &'r Registry<E>) -> Self {
        Self { registry }
    }
}

impl<'de, 'r, E: EnumValue> DeserializeSeed<'de> for SetSeed<'r, E> {
    type Value = EnumSet<'r, E>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(SetVisitor {
            registry: self.registry,
        })
    }
}

struct SetVisitor<'r, E> {
    registry: &'r Registry<E>,
}

impl<'de, 'r, E: EnumValue> Visitor<'de> for SetVisitor<'r, E> {
    type Value = EnumSet<'r, E>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of `{}` constant names", self.registry.type_tag())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut set = EnumSet::new(self.registry);
        while let Some(e) = seq.next_element_seed(FamilySeed::new(self.registry))? {
            set.add(e);
        }
        Ok(set)
    }
}
