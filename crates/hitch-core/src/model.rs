//! Convenience wrapper for reading a model entity out of the store.

use crate::id::Entity;
use crate::store::{EntityQuery, EntityStore};

/// A thin handle over an entity expected to carry the model component.
/// Holding a `Model` says nothing about validity; check [`Model::valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model {
    entity: Entity,
}

impl Model {
    pub fn new(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Whether the wrapped entity exists and is a model.
    pub fn valid(&self, store: &EntityStore) -> bool {
        store.has_entity(self.entity) && store.is_model(self.entity)
    }

    /// The model's name, or an empty string when it has none.
    pub fn name<'s>(&self, store: &'s EntityStore) -> &'s str {
        store.name(self.entity).unwrap_or_default()
    }

    /// The link named `name` whose parent is this model.
    pub fn link_by_name(&self, store: &EntityStore, name: &str) -> Option<Entity> {
        store.entity_by_components(&EntityQuery::link().child_of(self.entity).named(name))
    }

    /// Number of links whose parent is this model.
    pub fn link_count(&self, store: &EntityStore) -> usize {
        store
            .entities_by_components(&EntityQuery::link().child_of(self.entity))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{spawn_link, spawn_model};

    #[test]
    fn model_reports_validity() {
        let mut store = EntityStore::new();
        let robot = spawn_model(&mut store, "robot");
        let base = spawn_link(&mut store, robot, "base");

        assert!(Model::new(robot).valid(&store));
        assert!(!Model::new(base).valid(&store));
        assert!(!Model::new(Entity::default()).valid(&store));
    }

    #[test]
    fn link_by_name_is_scoped_to_model() {
        let mut store = EntityStore::new();
        let robot = spawn_model(&mut store, "robot");
        let other = spawn_model(&mut store, "other");
        let base = spawn_link(&mut store, robot, "base");
        let _foreign = spawn_link(&mut store, other, "gripper");

        let model = Model::new(robot);
        assert_eq!(model.name(&store), "robot");
        assert_eq!(model.link_by_name(&store, "base"), Some(base));
        assert_eq!(model.link_by_name(&store, "gripper"), None);
        assert_eq!(model.link_count(&store), 1);
    }
}
