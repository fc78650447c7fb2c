//! Consistency and TTL policy resolution
//!
//! A relation type's effective consistency modifier and TTL come from the
//! type-modifier vertices it points at. Modifiers are consulted in traversal
//! order and the first one that defines the requested value wins. A relation
//! index variant that defines neither can inherit from its base type.

use log::debug;
use std::collections::HashSet;

use super::definition::{Definition, ModifierDefinition};
use super::errors::SchemaError;
use super::relation_type::base_type_of;
use super::schema_graph::SchemaView;
use super::schema_types::{ConsistencyModifier, Direction, EdgeCategory, SchemaId, SchemaKind};
use crate::config::ResolverConfig;

/// Computes the effective policy of a relation type from the current schema graph.
///
/// Implementations are pure over `view`: the same view must give the same answer.
pub trait PolicyResolver {
    fn consistency_modifier_of(
        &self,
        view: &dyn SchemaView,
        type_id: SchemaId,
    ) -> Result<ConsistencyModifier, SchemaError>;

    /// TTL in seconds, 0 meaning relations never expire
    fn ttl_of(&self, view: &dyn SchemaView, type_id: SchemaId) -> Result<u32, SchemaError>;
}

/// Resolves policy from type-modifier edges
#[derive(Debug, Clone)]
pub struct ModifierPolicyResolver {
    inherit_base_policy: bool,
    default_ttl_secs: u32,
}

impl Default for ModifierPolicyResolver {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl ModifierPolicyResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        ModifierPolicyResolver {
            inherit_base_policy: config.inherit_base_policy,
            default_ttl_secs: config.default_ttl_secs,
        }
    }

    /// First value `pick` finds on the modifiers of `type_id`, then of its base type
    fn find_modifier<T>(
        &self,
        view: &dyn SchemaView,
        type_id: SchemaId,
        pick: impl Fn(&ModifierDefinition) -> Option<T>,
    ) -> Result<Option<T>, SchemaError> {
        let mut visited = HashSet::new();
        let mut current = Some(type_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }

            for modifier_id in view.related(id, EdgeCategory::TypeModifier, Direction::Out) {
                let modifier = view.vertex(modifier_id)?;
                if modifier.kind != SchemaKind::TypeModifier {
                    return Err(SchemaError::NotATypeModifier {
                        id: modifier_id,
                        kind: modifier.kind,
                    });
                }
                match &modifier.definition {
                    Some(Definition::Modifier(def)) => {
                        if let Some(value) = pick(def) {
                            return Ok(Some(value));
                        }
                    }
                    Some(other) => {
                        return Err(SchemaError::DefinitionMismatch {
                            id: modifier_id,
                            expected: "modifier",
                            found: other.variant_name(),
                        })
                    }
                    None => {}
                }
            }

            if !self.inherit_base_policy {
                break;
            }
            current = base_type_of(view, id)?;
            if let Some(base) = current {
                debug!("No modifier on {}, falling back to base type {}", id, base);
            }
        }

        Ok(None)
    }
}

impl PolicyResolver for ModifierPolicyResolver {
    fn consistency_modifier_of(
        &self,
        view: &dyn SchemaView,
        type_id: SchemaId,
    ) -> Result<ConsistencyModifier, SchemaError> {
        Ok(self
            .find_modifier(view, type_id, |def| def.consistency)?
            .unwrap_or_default())
    }

    fn ttl_of(&self, view: &dyn SchemaView, type_id: SchemaId) -> Result<u32, SchemaError> {
        Ok(self
            .find_modifier(view, type_id, |def| def.ttl_secs)?
            .unwrap_or(self.default_ttl_secs))
    }
}
