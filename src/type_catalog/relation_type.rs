//! Relation type resolution
//!
//! A [`RelationType`] is one transaction's handle on an edge label or
//! property key. Its definition is typed and attached once, when the handle
//! is built from a schema vertex; everything derived from the rest of the
//! schema graph is either recomputed on every call or memoized until the
//! next [`RelationType::reset_cache`].
//!
//! # Memoized per cache epoch
//!
//! | Value | Source | Cleared by `reset_cache()` |
//! |---|---|---|
//! | key indexes | incoming indexed-by edges | always |
//! | consistency modifier | [`PolicyResolver`] | when `reset_policy_memo` is set (default) |
//! | TTL | [`PolicyResolver`] | when `reset_policy_memo` is set (default) |
//!
//! Base type and relation indexes are never memoized.
//!
//! # Ownership
//!
//! Memo fields use `Cell`/`RefCell` and hand out `Rc` slices, so a
//! `RelationType` is neither `Send` nor `Sync`. One transaction owns it and
//! the compiler rejects sharing it across threads.
//!
//! Within the thread, a handle dropped by [`SchemaTx::reset_caches`] is
//! retired: its definition snapshot may predate the reset, so every
//! operation that reads the schema view fails with
//! [`SchemaError::StaleRelationType`] instead of mixing old and new state.
//!
//! [`SchemaTx::reset_caches`]: super::schema_tx::SchemaTx::reset_caches

use log::{debug, trace, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::definition::RelationDefinition;
use super::errors::SchemaError;
use super::index_type::IndexType;
use super::policy::PolicyResolver;
use super::schema_graph::{SchemaVertex, SchemaView};
use super::schema_types::{
    ConsistencyModifier, Direction, EdgeCategory, Multiplicity, Order, SchemaId, SchemaKind,
};
use crate::config::ResolverConfig;

#[derive(Debug)]
pub struct RelationType {
    id: SchemaId,
    name: String,
    kind: SchemaKind,
    /// None for implicit and system types
    definition: Option<RelationDefinition>,
    reset_policy_memo: bool,

    consistency: Cell<Option<ConsistencyModifier>>,
    ttl: Cell<Option<u32>>,
    key_indexes: RefCell<Option<Rc<[IndexType]>>>,
    epoch: Cell<u64>,
    /// Set once the owning registry drops this handle
    retired: Cell<bool>,
}

impl RelationType {
    /// Build a handle from a schema vertex.
    ///
    /// Fails if the vertex is not an edge label or property key, or if it
    /// carries a definition that is not a relation definition.
    pub fn from_vertex(vertex: &SchemaVertex) -> Result<Self, SchemaError> {
        if !vertex.kind.is_relation_type() {
            return Err(SchemaError::NotARelationType {
                id: vertex.id,
                kind: vertex.kind,
            });
        }
        let definition = vertex.relation_definition()?.cloned();

        Ok(RelationType {
            id: vertex.id,
            name: vertex.name.clone(),
            kind: vertex.kind,
            definition,
            reset_policy_memo: ResolverConfig::default().reset_policy_memo,
            consistency: Cell::new(None),
            ttl: Cell::new(None),
            key_indexes: RefCell::new(None),
            epoch: Cell::new(0),
            retired: Cell::new(false),
        })
    }

    /// Build a handle for `id` from the vertex `view` holds
    pub fn load(view: &dyn SchemaView, id: SchemaId) -> Result<Self, SchemaError> {
        Self::from_vertex(view.vertex(id)?)
    }

    /// Apply the cache settings of `config`
    pub fn with_config(mut self, config: &ResolverConfig) -> Self {
        self.reset_policy_memo = config.reset_policy_memo;
        self
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn is_edge_label(&self) -> bool {
        self.kind == SchemaKind::EdgeLabel
    }

    pub fn is_property_key(&self) -> bool {
        self.kind == SchemaKind::PropertyKey
    }

    pub fn definition(&self) -> Option<&RelationDefinition> {
        self.definition.as_ref()
    }

    // ===== Definition attributes =====

    pub fn sort_key(&self) -> &[SchemaId] {
        match &self.definition {
            Some(def) => &def.sort_key,
            None => &[],
        }
    }

    pub fn sort_order(&self) -> Order {
        self.definition
            .as_ref()
            .map_or(Order::Asc, |def| def.sort_order)
    }

    pub fn signature(&self) -> &[SchemaId] {
        match &self.definition {
            Some(def) => &def.signature,
            None => &[],
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.definition.as_ref().is_some_and(|def| def.invisible)
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.definition
            .as_ref()
            .map_or(Multiplicity::Many2One, |def| def.multiplicity)
    }

    // ===== Policy (memoized) =====

    /// Effective consistency modifier, computed once per cache epoch.
    ///
    /// Within an epoch the memoized value is returned even if the schema
    /// graph has changed since it was computed.
    pub fn consistency_modifier(
        &self,
        view: &dyn SchemaView,
        policy: &dyn PolicyResolver,
    ) -> Result<ConsistencyModifier, SchemaError> {
        self.ensure_live()?;
        if let Some(consistency) = self.consistency.get() {
            trace!("Consistency memo hit for {}", self.id);
            return Ok(consistency);
        }

        let consistency = policy.consistency_modifier_of(view, self.id)?;
        debug!("Resolved consistency of {} '{}': {}", self.id, self.name, consistency);
        self.consistency.set(Some(consistency));
        Ok(consistency)
    }

    /// Effective TTL in seconds, computed once per cache epoch
    pub fn ttl(
        &self,
        view: &dyn SchemaView,
        policy: &dyn PolicyResolver,
    ) -> Result<u32, SchemaError> {
        self.ensure_live()?;
        if let Some(ttl) = self.ttl.get() {
            trace!("TTL memo hit for {}", self.id);
            return Ok(ttl);
        }

        let ttl = policy.ttl_of(view, self.id)?;
        debug!("Resolved TTL of {} '{}': {}s", self.id, self.name, ttl);
        self.ttl.set(Some(ttl));
        Ok(ttl)
    }

    // ===== Index hierarchy (never memoized) =====

    /// The base type this relation index variant belongs to, None for a base type
    pub fn base_type(&self, view: &dyn SchemaView) -> Result<Option<SchemaId>, SchemaError> {
        self.ensure_live()?;
        base_type_of(view, self.id)
    }

    pub fn is_base_type(&self, view: &dyn SchemaView) -> Result<bool, SchemaError> {
        Ok(self.base_type(view)?.is_none())
    }

    /// This type followed by its relation index variants, in traversal order.
    ///
    /// Meant for base types. A variant has no variants of its own, so it
    /// yields just itself.
    pub fn relation_indexes(&self, view: &dyn SchemaView) -> Result<Vec<SchemaId>, SchemaError> {
        self.ensure_live()?;
        let variants = view.related(self.id, EdgeCategory::RelationTypeIndex, Direction::Out);
        let mut indexes = Vec::with_capacity(variants.len() + 1);
        indexes.push(self.id);

        for variant in variants {
            ensure_relation_type(view, variant)?;
            indexes.push(variant);
        }
        Ok(indexes)
    }

    // ===== Key indexes (memoized) =====

    /// Composite indexes covering this type, in indexed-by traversal order.
    ///
    /// Repeated calls within a cache epoch return the same shared slice.
    pub fn key_indexes(&self, view: &dyn SchemaView) -> Result<Rc<[IndexType]>, SchemaError> {
        self.ensure_live()?;
        if let Some(indexes) = self.key_indexes.borrow().as_ref() {
            trace!("Key-index memo hit for {}", self.id);
            return Ok(Rc::clone(indexes));
        }

        let indexes = view
            .related(self.id, EdgeCategory::IndexField, Direction::In)
            .into_iter()
            .map(|source| view.vertex(source)?.as_index_type(view))
            .collect::<Result<Vec<_>, _>>()?;
        let indexes: Rc<[IndexType]> = indexes.into();

        debug!(
            "Resolved {} key indexes for {} '{}'",
            indexes.len(),
            self.id,
            self.name
        );
        *self.key_indexes.borrow_mut() = Some(Rc::clone(&indexes));
        Ok(indexes)
    }

    // ===== Cache epoch =====

    /// Start a new cache epoch.
    ///
    /// Always clears the key-index memo. Clears the consistency and TTL memos
    /// too unless the handle was configured with `reset_policy_memo = false`.
    /// Safe to call any number of times.
    pub fn reset_cache(&self) {
        self.key_indexes.borrow_mut().take();
        if self.reset_policy_memo {
            self.consistency.set(None);
            self.ttl.set(None);
        }
        self.epoch.set(self.epoch.get() + 1);
        debug!("Reset caches of {} '{}' (epoch {})", self.id, self.name, self.epoch.get());
    }

    /// Number of cache resets this handle has seen
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Whether the owning registry has dropped this handle
    pub fn is_retired(&self) -> bool {
        self.retired.get()
    }

    /// Mark the handle as dropped by its registry. Permanent.
    pub(crate) fn retire(&self) {
        self.retired.set(true);
        debug!("Retired relation type handle {} '{}'", self.id, self.name);
    }

    fn ensure_live(&self) -> Result<(), SchemaError> {
        if self.retired.get() {
            warn!("Stale use of retired relation type {} '{}'", self.id, self.name);
            return Err(SchemaError::StaleRelationType { id: self.id });
        }
        Ok(())
    }
}

/// The unique source of an incoming index-of edge of `type_id`, if any.
///
/// More than one is an invariant violation of the schema graph.
pub fn base_type_of(
    view: &dyn SchemaView,
    type_id: SchemaId,
) -> Result<Option<SchemaId>, SchemaError> {
    let sources = view.related(type_id, EdgeCategory::RelationTypeIndex, Direction::In);
    match sources.as_slice() {
        [] => Ok(None),
        [base] => {
            ensure_relation_type(view, *base)?;
            Ok(Some(*base))
        }
        _ => {
            warn!(
                "Relation type {} has {} incoming index-of edges: {:?}",
                type_id,
                sources.len(),
                sources
            );
            Err(SchemaError::MultipleBaseTypes {
                id: type_id,
                count: sources.len(),
            })
        }
    }
}

fn ensure_relation_type(view: &dyn SchemaView, id: SchemaId) -> Result<(), SchemaError> {
    let vertex = view.vertex(id)?;
    if vertex.kind.is_relation_type() {
        Ok(())
    } else {
        Err(SchemaError::NotARelationType {
            id,
            kind: vertex.kind,
        })
    }
}
