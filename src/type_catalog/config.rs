//! Schema graph configuration
//!
//! Loads the vertices and typed edges of a schema graph from YAML or JSON,
//! for fixtures, tooling and bootstrapping a catalog.
//!
//! # Format
//!
//! ```yaml
//! name: social
//! vertices:
//!   - id: 1
//!     name: knows
//!     kind: edge_label
//!     definition:
//!       relation:
//!         sort_key: [4]
//!         sort_order: desc
//!         multiplicity: MULTI
//!   - id: 2
//!     name: knows_by_time
//!     kind: edge_label
//!   - id: 4
//!     name: time
//!     kind: property_key
//!   - id: 10
//!     name: by_time
//!     kind: composite_index
//!     definition:
//!       index:
//!         unique: false
//! edges:
//!   - { category: index_of, from: 1, to: 2 }
//!   - { category: indexed_by, from: 10, to: 4 }
//! ```
//!
//! Loading checks configuration hygiene only: unique ids and names, exactly
//! one definition block per vertex, and edges between declared vertices.
//! Whether the resulting schema graph makes sense is not checked here.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::definition::{Definition, IndexDefinition, ModifierDefinition, RelationDefinition};
use super::errors::SchemaError;
use super::schema_graph::{SchemaGraph, SchemaVertex};
use super::schema_types::{EdgeCategory, SchemaId, SchemaKind};

/// Schema graph loaded from YAML/JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaGraphConfig {
    /// Optional schema name
    #[serde(default)]
    pub name: Option<String>,
    pub vertices: Vec<VertexDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
}

/// Vertex definition in schema config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDefinition {
    pub id: SchemaId,
    pub name: String,
    pub kind: SchemaKind,
    /// Omit for implicit and system types
    #[serde(default)]
    pub definition: Option<DefinitionBlock>,
}

/// Definition block: exactly one of the three entries must be present
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionBlock {
    #[serde(default)]
    pub relation: Option<RelationDefinition>,
    #[serde(default)]
    pub index: Option<IndexDefinition>,
    #[serde(default)]
    pub modifier: Option<ModifierDefinition>,
}

impl DefinitionBlock {
    fn to_definition(&self, vertex: &str) -> Result<Definition, SchemaError> {
        match (&self.relation, &self.index, &self.modifier) {
            (Some(def), None, None) => Ok(Definition::Relation(def.clone())),
            (None, Some(def), None) => Ok(Definition::Index(def.clone())),
            (None, None, Some(def)) => Ok(Definition::Modifier(def.clone())),
            _ => Err(SchemaError::InvalidConfig {
                message: format!(
                    "Vertex '{}' must define exactly one of relation, index or modifier",
                    vertex
                ),
            }),
        }
    }
}

/// Typed edge in schema config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub category: EdgeCategory,
    pub from: SchemaId,
    pub to: SchemaId,
}

impl SchemaGraphConfig {
    /// Load schema graph configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|e| SchemaError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse schema graph configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Parse schema graph configuration from JSON string
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Basic validation of the schema configuration
    pub fn validate(&self) -> Result<(), SchemaError> {
        let context = format!("In schema '{}'", self.name.as_deref().unwrap_or("<unnamed>"));

        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        for vertex in &self.vertices {
            if !seen_ids.insert(vertex.id) {
                return Err(SchemaError::config_error_with_context(
                    format!("Duplicate vertex id: {}", vertex.id),
                    context.as_str(),
                ));
            }
            if !seen_names.insert(vertex.name.as_str()) {
                return Err(SchemaError::config_error_with_context(
                    format!("Duplicate vertex name: {}", vertex.name),
                    context.as_str(),
                ));
            }
            if let Some(block) = &vertex.definition {
                block.to_definition(&vertex.name)?;
            }
        }

        for edge in &self.edges {
            for endpoint in [edge.from, edge.to] {
                if !seen_ids.contains(&endpoint) {
                    return Err(SchemaError::config_error_with_context(
                        format!(
                            "{} edge {} -> {} references undeclared vertex {}",
                            edge.category, edge.from, edge.to, endpoint
                        ),
                        context.as_str(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Convert to SchemaGraph, keeping edge order as declared
    pub fn to_schema_graph(&self) -> Result<SchemaGraph, SchemaError> {
        self.validate()?; // Validate before converting

        let mut graph = SchemaGraph::new();
        for vertex_def in &self.vertices {
            let mut vertex =
                SchemaVertex::new(vertex_def.id, vertex_def.name.clone(), vertex_def.kind);
            if let Some(block) = &vertex_def.definition {
                vertex.definition = Some(block.to_definition(&vertex_def.name)?);
            }
            graph.add_vertex(vertex);
        }

        for edge in &self.edges {
            graph.add_edge(edge.category, edge.from, edge.to)?;
        }

        log::info!(
            "Loaded schema graph '{}': {} vertices, {} edges",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.vertices.len(),
            self.edges.len()
        );
        Ok(graph)
    }
}
