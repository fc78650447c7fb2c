//! Typed schema definitions
//!
//! A schema vertex carries at most one definition, and the definition's
//! variant is fixed by what the vertex is. Every field is typed when the
//! definition is built, so reading a definition never fails; the only
//! possible mismatch is attaching the wrong variant to a vertex, which is
//! caught when a relation type or index view is constructed.

use serde::{Deserialize, Serialize};

use super::schema_types::{ConsistencyModifier, Multiplicity, Order, SchemaId};

/// Structural definition of an edge label or property key.
///
/// Fields left out of a config fall back to the same defaults a relation type
/// without any definition resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationDefinition {
    /// Relation types whose values order relations of this type
    pub sort_key: Vec<SchemaId>,
    pub sort_order: Order,
    /// Relation types stored inline, not part of the sort key
    pub signature: Vec<SchemaId>,
    /// Hidden from user-facing schema listings
    pub invisible: bool,
    pub multiplicity: Multiplicity,
}

/// Definition of a composite index
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexDefinition {
    /// At most one element per combination of indexed values
    pub unique: bool,
    pub consistency: ConsistencyModifier,
}

/// Overrides a type modifier applies to the relation types pointing at it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierDefinition {
    pub consistency: Option<ConsistencyModifier>,
    pub ttl_secs: Option<u32>,
}

/// The definition attached to a schema vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    Relation(RelationDefinition),
    Index(IndexDefinition),
    Modifier(ModifierDefinition),
}

impl Definition {
    /// Name of the variant, used in mismatch errors
    pub fn variant_name(&self) -> &'static str {
        match self {
            Definition::Relation(_) => "relation",
            Definition::Index(_) => "index",
            Definition::Modifier(_) => "modifier",
        }
    }

    pub fn as_relation(&self) -> Option<&RelationDefinition> {
        match self {
            Definition::Relation(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<&IndexDefinition> {
        match self {
            Definition::Index(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_modifier(&self) -> Option<&ModifierDefinition> {
        match self {
            Definition::Modifier(def) => Some(def),
            _ => None,
        }
    }
}

impl From<RelationDefinition> for Definition {
    fn from(def: RelationDefinition) -> Self {
        Definition::Relation(def)
    }
}

impl From<IndexDefinition> for Definition {
    fn from(def: IndexDefinition) -> Self {
        Definition::Index(def)
    }
}

impl From<ModifierDefinition> for Definition {
    fn from(def: ModifierDefinition) -> Self {
        Definition::Modifier(def)
    }
}
