//! Typegraph - relation-type metadata for a transactional property-graph schema
//!
//! Every edge label and property key is itself a schema vertex. This crate
//! resolves the structural properties of those relation types on demand:
//! - Definition attributes (sort key, sort order, signature, visibility, multiplicity)
//! - Index hierarchy (base type ↔ relation index variants)
//! - Composite key-index membership
//! - Consistency and TTL policy
//!
//! Expensive derived values are memoized per transaction and dropped on
//! explicit cache resets.

pub mod config;
pub mod type_catalog;
