use slotmap::{Key, new_key_type};

new_key_type! {
    /// Identifies an entity in the shared simulation store.
    pub struct Entity;
}

impl Entity {
    /// Raw integer form of the entity, used by event payloads that cross
    /// into collaborators which only understand plain ids.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}
