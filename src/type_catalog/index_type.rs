//! Composite index view over a schema vertex

use super::definition::Definition;
use super::errors::SchemaError;
use super::schema_graph::{SchemaVertex, SchemaView};
use super::schema_types::{ConsistencyModifier, Direction, EdgeCategory, SchemaId};

/// A composite index and the relation types it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexType {
    pub id: SchemaId,
    pub name: String,
    pub unique: bool,
    pub consistency: ConsistencyModifier,
    /// Covered relation types, in indexed-by traversal order
    pub fields: Vec<SchemaId>,
}

impl IndexType {
    pub fn covers(&self, type_id: SchemaId) -> bool {
        self.fields.contains(&type_id)
    }

    /// Whether the index spans more than one relation type
    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }
}

impl SchemaVertex {
    /// View this vertex as a composite index.
    ///
    /// Fails if the vertex is not an index, or if it carries a definition
    /// that is not an index definition. An index without a definition is
    /// neither unique nor locked.
    pub fn as_index_type(&self, view: &dyn SchemaView) -> Result<IndexType, SchemaError> {
        if !self.kind.is_index() {
            return Err(SchemaError::NotAnIndex {
                id: self.id,
                kind: self.kind,
            });
        }

        let (unique, consistency) = match &self.definition {
            None => (false, ConsistencyModifier::Default),
            Some(Definition::Index(def)) => (def.unique, def.consistency),
            Some(other) => {
                return Err(SchemaError::DefinitionMismatch {
                    id: self.id,
                    expected: "index",
                    found: other.variant_name(),
                })
            }
        };

        Ok(IndexType {
            id: self.id,
            name: self.name.clone(),
            unique,
            consistency,
            fields: view.related(self.id, EdgeCategory::IndexField, Direction::Out),
        })
    }
}
