use crate::id::Entity;
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

/// Marks an entity as a model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTag;

/// Marks an entity as a link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTag;

/// Joint type recorded on every detachable joint created by this workspace.
pub const FIXED_JOINT: &str = "fixed";

/// Describes an active connection between two links. The physics
/// collaborator treats the presence of this component as "attached".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachableJointComponent {
    pub parent_link: Entity,
    pub child_link: Entity,
    pub joint_type: String,
}

impl DetachableJointComponent {
    /// A fixed joint between `parent_link` and `child_link`.
    pub fn fixed(parent_link: Entity, child_link: Entity) -> Self {
        Self {
            parent_link,
            child_link,
            joint_type: FIXED_JOINT.to_string(),
        }
    }
}

/// SoA component storage. Each component type has its own SecondaryMap
/// keyed by Entity, providing O(1) access with contiguous storage.
#[derive(Debug, Clone, Default)]
pub struct ComponentStorage {
    pub models: SecondaryMap<Entity, ModelTag>,
    pub links: SecondaryMap<Entity, LinkTag>,
    pub names: SecondaryMap<Entity, String>,
    pub parents: SecondaryMap<Entity, Entity>,
    pub detachable_joints: SecondaryMap<Entity, DetachableJointComponent>,
}

impl ComponentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all components for a given entity.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.models.remove(entity);
        self.links.remove(entity);
        self.names.remove(entity);
        self.parents.remove(entity);
        self.detachable_joints.remove(entity);
    }
}
