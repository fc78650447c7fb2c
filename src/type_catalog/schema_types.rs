//! Identity and shared enumerations of the schema graph
//!
//! These are the opaque value types the rest of the schema subsystem hands
//! around. Each enumeration has a canonical config spelling (used when
//! serializing) and parses case-insensitively with a few aliases.
//!
//! # Example
//!
//! ```yaml
//! definition:
//!   relation:
//!     sort_order: desc          # or DESC, descending
//!     multiplicity: MANY2ONE    # or many2one, many_to_one
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, graph-assigned identity of a schema vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub u64);

impl SchemaId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for SchemaId {
    fn from(id: u64) -> Self {
        SchemaId(id)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declares a config-facing enumeration.
///
/// The first spelling of each variant is canonical; `Display`, `as_str` and
/// serialization use it. `from_str` accepts every listed spelling, ignoring case.
macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => [$canonical:literal $(, $alias:literal)*]
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Canonical config spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $canonical,)+
                }
            }

            /// Parse from config, case-insensitive, aliases allowed
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Result<Self, String> {
                let needle = s.trim().to_lowercase();
                $(
                    if needle == $canonical.to_lowercase()
                        $(|| needle == $alias.to_lowercase())*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!(
                    "Unknown {}: '{}'. Supported: {}",
                    $what,
                    s,
                    [$($canonical),+].join(", ")
                ))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::from_str(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

schema_enum! {
    /// What a schema vertex stands for
    SchemaKind, "schema kind" {
        /// Relation type connecting two vertices
        EdgeLabel => ["edge_label", "edge", "label"],
        /// Relation type attaching a value to a vertex
        PropertyKey => ["property_key", "property", "key"],
        /// Composite index over one or more relation types
        CompositeIndex => ["composite_index", "index"],
        /// Carrier of consistency and TTL overrides
        TypeModifier => ["type_modifier", "modifier"],
    }
}

impl SchemaKind {
    /// Edge labels and property keys are both relation types
    pub fn is_relation_type(&self) -> bool {
        matches!(self, SchemaKind::EdgeLabel | SchemaKind::PropertyKey)
    }

    pub fn is_index(&self) -> bool {
        matches!(self, SchemaKind::CompositeIndex)
    }
}

schema_enum! {
    /// Direction of a schema-graph edge as seen from one of its endpoints
    Direction, "direction" {
        In => ["in", "incoming"],
        Out => ["out", "outgoing"],
    }
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

schema_enum! {
    /// Sort order of relations under a sort key
    Order, "sort order" {
        Asc => ["asc", "ascending"],
        Desc => ["desc", "descending"],
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::Asc
    }
}

schema_enum! {
    /// Cardinality constraint on relations of a type
    Multiplicity, "multiplicity" {
        /// Any number of parallel relations
        Multi => ["MULTI"],
        /// At most one relation between any pair of vertices
        Simple => ["SIMPLE"],
        /// At most one outgoing relation per vertex
        Many2One => ["MANY2ONE", "many_to_one"],
        /// At most one incoming relation per vertex
        One2Many => ["ONE2MANY", "one_to_many"],
        /// At most one relation per vertex in either direction
        One2One => ["ONE2ONE", "one_to_one"],
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Multiplicity::Many2One
    }
}

impl Multiplicity {
    /// Whether a vertex may have at most one relation of this type in `direction`
    pub fn is_unique(&self, direction: Direction) -> bool {
        match direction {
            Direction::Out => matches!(self, Multiplicity::Many2One | Multiplicity::One2One),
            Direction::In => matches!(self, Multiplicity::One2Many | Multiplicity::One2One),
        }
    }

    /// Whether writes in `direction` have to be checked against existing relations
    pub fn is_constrained(&self, direction: Direction) -> bool {
        match self {
            Multiplicity::Multi => false,
            Multiplicity::Simple => true,
            _ => self.is_unique(direction),
        }
    }
}

schema_enum! {
    /// How concurrent writes to relations of a type are reconciled
    ConsistencyModifier, "consistency modifier" {
        /// Storage backend default
        Default => ["default"],
        /// Acquire locks so conflicting writes fail
        Lock => ["lock"],
        /// Write a new copy so concurrent modifications both survive
        Fork => ["fork"],
    }
}

impl Default for ConsistencyModifier {
    fn default() -> Self {
        ConsistencyModifier::Default
    }
}

schema_enum! {
    /// Category of a typed schema-graph edge
    EdgeCategory, "edge category" {
        /// index-of: base relation type (source) to relation index variant (target)
        RelationTypeIndex => ["relation_type_index", "index_of"],
        /// indexed-by: composite index (source) to a relation type it covers (target)
        IndexField => ["index_field", "indexed_by"],
        /// type-modifier: relation type (source) to a modifier vertex (target)
        TypeModifier => ["type_modifier", "modifier"],
    }
}
