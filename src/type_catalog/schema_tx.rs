//! Transaction-scoped relation type registry
//!
//! A [`SchemaTx`] hands out one [`RelationType`] per schema id and keeps
//! handing out the same instance until its caches are reset. It is the only
//! owner of those instances: `Rc` handles cannot leave the thread, so a
//! relation type can never be shared between transactions.
//!
//! # Cache epochs
//!
//! The registry does not watch the schema graph. When the transaction's view
//! may have changed (for example after a schema-mutating commit became
//! visible), call [`SchemaTx::reset_caches`], or [`SchemaTx::refresh_if_changed`]
//! to reset only when the view's generation moved. Handles obtained before a
//! reset are retired and fail with [`SchemaError::StaleRelationType`]; look
//! the type up again to get one for the new epoch.

use log::{debug, info, trace};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::errors::SchemaError;
use super::policy::{ModifierPolicyResolver, PolicyResolver};
use super::relation_type::RelationType;
use super::schema_graph::SchemaView;
use super::schema_types::{ConsistencyModifier, SchemaId};
use crate::config::ResolverConfig;

pub struct SchemaTx {
    config: ResolverConfig,
    policy: Box<dyn PolicyResolver>,
    types: RefCell<HashMap<SchemaId, Rc<RelationType>>>,
    /// View generation seen at the first lookup of this epoch
    generation: Cell<Option<u64>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
    resets: Cell<u64>,
}

impl SchemaTx {
    /// Registry resolving policy from type-modifier edges
    pub fn new(config: ResolverConfig) -> Self {
        let policy = ModifierPolicyResolver::new(&config);
        Self::with_policy(config, Box::new(policy))
    }

    pub fn with_defaults() -> Self {
        Self::new(ResolverConfig::default())
    }

    /// Registry with a custom policy resolver
    pub fn with_policy(config: ResolverConfig, policy: Box<dyn PolicyResolver>) -> Self {
        SchemaTx {
            config,
            policy,
            types: RefCell::new(HashMap::new()),
            generation: Cell::new(None),
            hits: Cell::new(0),
            misses: Cell::new(0),
            resets: Cell::new(0),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn policy(&self) -> &dyn PolicyResolver {
        self.policy.as_ref()
    }

    /// The relation type behind `id`, instantiated on first use in this epoch
    pub fn relation_type(
        &self,
        view: &dyn SchemaView,
        id: SchemaId,
    ) -> Result<Rc<RelationType>, SchemaError> {
        if let Some(ty) = self.types.borrow().get(&id) {
            self.hits.set(self.hits.get() + 1);
            trace!("Registry hit for {}", id);
            return Ok(Rc::clone(ty));
        }

        self.misses.set(self.misses.get() + 1);
        if self.generation.get().is_none() {
            self.generation.set(Some(view.generation()));
        }

        let ty = Rc::new(RelationType::load(view, id)?.with_config(&self.config));
        debug!("Instantiated relation type {} '{}'", id, ty.name());
        self.types.borrow_mut().insert(id, Rc::clone(&ty));
        Ok(ty)
    }

    /// The base type of `ty` as a registry instance
    pub fn base_type(
        &self,
        view: &dyn SchemaView,
        ty: &RelationType,
    ) -> Result<Option<Rc<RelationType>>, SchemaError> {
        ty.base_type(view)?
            .map(|base| self.relation_type(view, base))
            .transpose()
    }

    /// `ty` followed by its relation index variants, as registry instances
    pub fn relation_indexes(
        &self,
        view: &dyn SchemaView,
        ty: &RelationType,
    ) -> Result<Vec<Rc<RelationType>>, SchemaError> {
        ty.relation_indexes(view)?
            .into_iter()
            .map(|id| self.relation_type(view, id))
            .collect()
    }

    /// Consistency modifier of `ty` under this registry's policy resolver
    pub fn consistency_modifier(
        &self,
        view: &dyn SchemaView,
        ty: &RelationType,
    ) -> Result<ConsistencyModifier, SchemaError> {
        ty.consistency_modifier(view, self.policy.as_ref())
    }

    /// TTL of `ty` under this registry's policy resolver
    pub fn ttl(&self, view: &dyn SchemaView, ty: &RelationType) -> Result<u32, SchemaError> {
        ty.ttl(view, self.policy.as_ref())
    }

    /// Start a new cache epoch for every relation type of this transaction.
    ///
    /// Live handles have their memos reset and are retired, and the registry
    /// forgets them so the next lookup re-reads the vertex and its definition.
    pub fn reset_caches(&self) {
        let mut types = self.types.borrow_mut();
        for ty in types.values() {
            ty.reset_cache();
            ty.retire();
        }
        let dropped = types.len();
        types.clear();

        self.generation.set(None);
        self.resets.set(self.resets.get() + 1);
        info!("Reset schema caches: {} relation types dropped", dropped);
    }

    /// Reset caches if `view` changed since the registry last looked at it.
    /// Returns whether a reset happened.
    pub fn refresh_if_changed(&self, view: &dyn SchemaView) -> bool {
        match self.generation.get() {
            Some(seen) if seen != view.generation() => {
                debug!(
                    "Schema view moved from generation {} to {}",
                    seen,
                    view.generation()
                );
                self.reset_caches();
                true
            }
            _ => false,
        }
    }

    pub fn metrics(&self) -> RegistryMetrics {
        RegistryMetrics {
            hits: self.hits.get(),
            misses: self.misses.get(),
            resets: self.resets.get(),
            live_types: self.types.borrow().len(),
        }
    }
}

/// Registry metrics for monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryMetrics {
    pub hits: u64,
    pub misses: u64,
    pub resets: u64,
    pub live_types: usize,
}

impl RegistryMetrics {
    /// Calculate lookup hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
