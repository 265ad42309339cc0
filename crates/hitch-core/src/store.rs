//! Shared entity-component store.
//!
//! Entities live in a `SlotMap`; their components live in the SoA
//! [`ComponentStorage`]. Removal is requested, not performed: requested
//! entities are collected and removed in one batch by
//! [`EntityStore::process_removals`], which the step driver calls after
//! every system has run.
//!
//! Every structural mutation (entity creation, component attach, removal
//! request) bumps [`EntityStore::revision`], so callers can detect whether a
//! step touched the store at all.

use crate::component::{ComponentStorage, DetachableJointComponent, LinkTag, ModelTag};
use crate::id::Entity;
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Query filter
// ---------------------------------------------------------------------------

/// Component predicates for [`EntityStore::entity_by_components`]. Unset
/// predicates match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityQuery<'a> {
    pub model: bool,
    pub link: bool,
    pub name: Option<&'a str>,
    pub parent: Option<Entity>,
}

impl<'a> EntityQuery<'a> {
    /// Entities carrying the model component.
    pub fn model() -> Self {
        Self {
            model: true,
            ..Self::default()
        }
    }

    /// Entities carrying the link component.
    pub fn link() -> Self {
        Self {
            link: true,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn child_of(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }
}

// ---------------------------------------------------------------------------
// EntityStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: SlotMap<Entity, ()>,
    components: ComponentStorage,
    /// Entities whose removal was requested but not yet applied.
    pending_removals: Vec<Entity>,
    revision: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        self.revision += 1;
        self.entities.insert(())
    }

    /// Whether `entity` exists (removal requests do not count until applied).
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Monotonic counter of structural mutations.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -- Component attach ---------------------------------------------------

    pub fn add_model(&mut self, entity: Entity) {
        if self.has_entity(entity) {
            self.revision += 1;
            self.components.models.insert(entity, ModelTag);
        }
    }

    pub fn add_link(&mut self, entity: Entity) {
        if self.has_entity(entity) {
            self.revision += 1;
            self.components.links.insert(entity, LinkTag);
        }
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) {
        if self.has_entity(entity) {
            self.revision += 1;
            self.components.names.insert(entity, name.into());
        }
    }

    pub fn set_parent(&mut self, entity: Entity, parent: Entity) {
        if self.has_entity(entity) {
            self.revision += 1;
            self.components.parents.insert(entity, parent);
        }
    }

    pub fn set_detachable_joint(&mut self, entity: Entity, joint: DetachableJointComponent) {
        if self.has_entity(entity) {
            self.revision += 1;
            self.components.detachable_joints.insert(entity, joint);
        }
    }

    // -- Component read -----------------------------------------------------

    pub fn is_model(&self, entity: Entity) -> bool {
        self.components.models.contains_key(entity)
    }

    pub fn is_link(&self, entity: Entity) -> bool {
        self.components.links.contains_key(entity)
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.components.names.get(entity).map(String::as_str)
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.components.parents.get(entity).copied()
    }

    pub fn detachable_joint(&self, entity: Entity) -> Option<&DetachableJointComponent> {
        self.components.detachable_joints.get(entity)
    }

    /// All live detachable joints, as consumed by the physics collaborator.
    pub fn detachable_joints(&self) -> impl Iterator<Item = (Entity, &DetachableJointComponent)> {
        self.components.detachable_joints.iter()
    }

    // -- Queries --------------------------------------------------------------

    /// First entity (in slot order) matching every predicate of `query`.
    pub fn entity_by_components(&self, query: &EntityQuery<'_>) -> Option<Entity> {
        self.entities_by_components(query).next()
    }

    /// Every entity matching `query`.
    pub fn entities_by_components<'s>(
        &'s self,
        query: &'s EntityQuery<'_>,
    ) -> impl Iterator<Item = Entity> + 's {
        self.entities.keys().filter(move |&e| self.matches(e, query))
    }

    fn matches(&self, entity: Entity, query: &EntityQuery<'_>) -> bool {
        if query.model && !self.is_model(entity) {
            return false;
        }
        if query.link && !self.is_link(entity) {
            return false;
        }
        if let Some(name) = query.name
            && self.name(entity) != Some(name)
        {
            return false;
        }
        if let Some(parent) = query.parent
            && self.parent(entity) != Some(parent)
        {
            return false;
        }
        true
    }

    // -- Removal --------------------------------------------------------------

    /// Request removal of `entity`. The entity stays live until the next
    /// [`process_removals`](Self::process_removals).
    pub fn request_remove_entity(&mut self, entity: Entity) {
        if self.has_entity(entity) && !self.pending_removals.contains(&entity) {
            self.revision += 1;
            self.pending_removals.push(entity);
        }
    }

    /// Whether removal of `entity` has been requested and not yet applied.
    pub fn is_removal_pending(&self, entity: Entity) -> bool {
        self.pending_removals.contains(&entity)
    }

    /// Entities awaiting removal, in request order.
    pub fn pending_removals(&self) -> &[Entity] {
        &self.pending_removals
    }

    /// Apply all pending removal requests. Returns the removed entities.
    pub fn process_removals(&mut self) -> Vec<Entity> {
        let removed = std::mem::take(&mut self.pending_removals);
        for &entity in &removed {
            self.components.remove_entity(entity);
            self.entities.remove(entity);
        }
        removed
    }
}

// ===========================================================================
// Tests
// ===========================================================================
