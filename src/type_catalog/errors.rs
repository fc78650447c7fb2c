//! # Type Catalog Error Types
//!
//! Every failure in this layer is an invariant violation of the schema graph
//! or a malformed schema configuration. None of them are transient: callers
//! do not retry, and the owning transaction decides whether to abort.
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: an id that does not name a vertex of the schema view
//! - **Conversion Errors**: a vertex used as something it is not (relation type, index, type modifier)
//! - **Definition Errors**: a definition of the wrong kind attached to a vertex
//! - **Hierarchy Errors**: a relation type with more than one base type
//! - **Staleness Errors**: a relation type handle used after its registry reset its caches
//! - **Configuration Errors**: file I/O and parsing issues while loading a schema graph

use thiserror::Error;

use super::schema_types::{SchemaId, SchemaKind};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("No schema vertex found for id {id}")]
    UnknownVertex { id: SchemaId },
    #[error("Schema vertex {id} of kind {kind} is not a relation type")]
    NotARelationType { id: SchemaId, kind: SchemaKind },
    #[error("Schema vertex {id} of kind {kind} is not an index")]
    NotAnIndex { id: SchemaId, kind: SchemaKind },
    #[error("Schema vertex {id} of kind {kind} is not a type modifier")]
    NotATypeModifier { id: SchemaId, kind: SchemaKind },
    #[error(
        "Schema vertex {id} carries a {found} definition where a {expected} definition is required"
    )]
    DefinitionMismatch {
        id: SchemaId,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Relation type {id} has {count} base types, at most one is allowed")]
    MultipleBaseTypes { id: SchemaId, count: usize },
    #[error("Relation type {id} was retired by a schema cache reset; look it up again")]
    StaleRelationType { id: SchemaId },
    #[error("Failed to read schema configuration: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse schema configuration: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid schema configuration: {message}")]
    InvalidConfig { message: String },
}

/// Helper methods for creating errors with context information
impl SchemaError {
    /// Create an InvalidConfig error with context information
    ///
    /// # Example
    /// ```ignore
    /// SchemaError::config_error_with_context(
    ///     "Duplicate vertex id #7",
    ///     "While loading vertices from schema.yaml"
    /// )
    /// ```
    pub fn config_error_with_context(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidConfig {
            message: format!("{}\n  Context: {}", message.into(), context.into()),
        }
    }

    /// Whether this error came from loading configuration rather than from
    /// reading an already loaded schema graph
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SchemaError::ConfigReadError { .. }
                | SchemaError::ConfigParseError { .. }
                | SchemaError::InvalidConfig { .. }
        )
    }
}
