pub mod config;
pub mod definition;
pub mod errors;
pub mod index_type;
pub mod policy;
pub mod relation_type;
pub mod schema_graph;
pub mod schema_tx;
pub mod schema_types;

// Re-export commonly used types
pub use config::SchemaGraphConfig;
pub use definition::{Definition, IndexDefinition, ModifierDefinition, RelationDefinition};
pub use errors::SchemaError;
pub use index_type::IndexType;
pub use policy::{ModifierPolicyResolver, PolicyResolver};
pub use relation_type::RelationType;
pub use schema_graph::{SchemaGraph, SchemaVertex, SchemaView};
pub use schema_tx::{RegistryMetrics, SchemaTx};
pub use schema_types::{
    ConsistencyModifier, Direction, EdgeCategory, Multiplicity, Order, SchemaId, SchemaKind,
};
