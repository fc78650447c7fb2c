//! Schema graph: vertices, typed edges and the view the resolvers read
//!
//! Resolvers never traverse storage themselves. They ask a [`SchemaView`] for
//! the vertex behind an id and for the ids related to it through one edge
//! category in one direction, and compose those answers. The surrounding
//! transaction decides what the view reflects.

use log::debug;
use std::collections::HashMap;

use super::definition::{Definition, RelationDefinition};
use super::errors::SchemaError;
use super::schema_types::{Direction, EdgeCategory, SchemaId, SchemaKind};

/// A schema entity: relation type, composite index or type modifier
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaVertex {
    pub id: SchemaId,
    pub name: String,
    pub kind: SchemaKind,
    /// Absent for implicit and system types
    pub definition: Option<Definition>,
}

impl SchemaVertex {
    pub fn new(id: impl Into<SchemaId>, name: impl Into<String>, kind: SchemaKind) -> Self {
        SchemaVertex {
            id: id.into(),
            name: name.into(),
            kind,
            definition: None,
        }
    }

    pub fn edge_label(id: impl Into<SchemaId>, name: impl Into<String>) -> Self {
        Self::new(id, name, SchemaKind::EdgeLabel)
    }

    pub fn property_key(id: impl Into<SchemaId>, name: impl Into<String>) -> Self {
        Self::new(id, name, SchemaKind::PropertyKey)
    }

    pub fn composite_index(id: impl Into<SchemaId>, name: impl Into<String>) -> Self {
        Self::new(id, name, SchemaKind::CompositeIndex)
    }

    pub fn type_modifier(id: impl Into<SchemaId>, name: impl Into<String>) -> Self {
        Self::new(id, name, SchemaKind::TypeModifier)
    }

    pub fn with_definition(mut self, definition: impl Into<Definition>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// The relation definition, if any.
    ///
    /// A definition of another variant is a fatal mismatch, not an absent one.
    pub fn relation_definition(&self) -> Result<Option<&RelationDefinition>, SchemaError> {
        match &self.definition {
            None => Ok(None),
            Some(Definition::Relation(def)) => Ok(Some(def)),
            Some(other) => Err(SchemaError::DefinitionMismatch {
                id: self.id,
                expected: "relation",
                found: other.variant_name(),
            }),
        }
    }
}

/// Read access to one transaction's view of the schema graph
pub trait SchemaView {
    /// The vertex behind `id`
    fn vertex(&self, id: SchemaId) -> Result<&SchemaVertex, SchemaError>;

    /// Ids reached from `id` over `category` edges in `direction`, in traversal order
    fn related(
        &self,
        id: SchemaId,
        category: EdgeCategory,
        direction: Direction,
    ) -> Vec<SchemaId>;

    /// Changes whenever the view's vertices or edges change
    fn generation(&self) -> u64;
}

/// In-memory schema graph indexed by (vertex, edge category, direction)
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    vertices: HashMap<SchemaId, SchemaVertex>,
    adjacency: HashMap<(SchemaId, EdgeCategory, Direction), Vec<SchemaId>>,
    generation: u64,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex, returning the one it replaced.
    ///
    /// Edges of a replaced vertex are kept.
    pub fn add_vertex(&mut self, vertex: SchemaVertex) -> Option<SchemaVertex> {
        debug!("Adding schema vertex {} '{}' ({})", vertex.id, vertex.name, vertex.kind);
        self.generation += 1;
        self.vertices.insert(vertex.id, vertex)
    }

    /// Replace the definition of an existing vertex
    pub fn set_definition(
        &mut self,
        id: SchemaId,
        definition: Option<Definition>,
    ) -> Result<(), SchemaError> {
        let vertex = self
            .vertices
            .get_mut(&id)
            .ok_or(SchemaError::UnknownVertex { id })?;
        vertex.definition = definition;
        self.generation += 1;
        debug!("Replaced definition of schema vertex {}", id);
        Ok(())
    }

    /// Add a `category` edge from `from` to `to`.
    ///
    /// Both endpoints must exist. Parallel edges are kept.
    pub fn add_edge(
        &mut self,
        category: EdgeCategory,
        from: SchemaId,
        to: SchemaId,
    ) -> Result<(), SchemaError> {
        for id in [from, to] {
            if !self.vertices.contains_key(&id) {
                return Err(SchemaError::UnknownVertex { id });
            }
        }

        self.adjacency
            .entry((from, category, Direction::Out))
            .or_default()
            .push(to);
        self.adjacency
            .entry((to, category, Direction::In))
            .or_default()
            .push(from);
        self.generation += 1;

        debug!("Added {} edge {} -> {}", category, from, to);
        Ok(())
    }

    /// Remove one `category` edge from `from` to `to`. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, category: EdgeCategory, from: SchemaId, to: SchemaId) -> bool {
        let removed_out =
            remove_first(self.adjacency.get_mut(&(from, category, Direction::Out)), to);
        let removed_in =
            remove_first(self.adjacency.get_mut(&(to, category, Direction::In)), from);
        debug_assert_eq!(removed_out, removed_in);

        if removed_out {
            self.generation += 1;
            debug!("Removed {} edge {} -> {}", category, from, to);
        }
        removed_out
    }

    pub fn contains(&self, id: SchemaId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Look a vertex up by name
    pub fn find_by_name(&self, name: &str) -> Option<&SchemaVertex> {
        self.vertices.values().find(|v| v.name == name)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &SchemaVertex> {
        self.vertices.values()
    }
}

fn remove_first(ids: Option<&mut Vec<SchemaId>>, target: SchemaId) -> bool {
    match ids {
        Some(ids) => match ids.iter().position(|id| *id == target) {
            Some(pos) => {
                ids.remove(pos);
                true
            }
            None => false,
        },
        None => false,
    }
}

impl SchemaView for SchemaGraph {
    fn vertex(&self, id: SchemaId) -> Result<&SchemaVertex, SchemaError> {
        self.vertices
            .get(&id)
            .ok_or(SchemaError::UnknownVertex { id })
    }

    fn related(
        &self,
        id: SchemaId,
        category: EdgeCategory,
        direction: Direction,
    ) -> Vec<SchemaId> {
        self.adjacency
            .get(&(id, category, direction))
            .cloned()
            .unwrap_or_default()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
