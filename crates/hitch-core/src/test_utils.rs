//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests and, through the `test-utils` feature, in
//! downstream crates' tests.

use crate::element::Element;
use crate::id::Entity;
use crate::store::EntityStore;

// ===========================================================================
// Entity spawners
// ===========================================================================

/// Spawn a named model entity.
pub fn spawn_model(store: &mut EntityStore, name: &str) -> Entity {
    let entity = store.create_entity();
    store.add_model(entity);
    store.set_name(entity, name);
    entity
}

/// Spawn a named link entity parented to `model`.
pub fn spawn_link(store: &mut EntityStore, model: Entity, name: &str) -> Entity {
    let entity = store.create_entity();
    store.add_link(entity);
    store.set_name(entity, name);
    store.set_parent(entity, model);
    entity
}

/// Spawn a model with one link per entry of `links`. Returns the model
/// followed by the links in order.
pub fn spawn_model_with_links(
    store: &mut EntityStore,
    name: &str,
    links: &[&str],
) -> (Entity, Vec<Entity>) {
    let model = spawn_model(store, name);
    let links = links
        .iter()
        .map(|link| spawn_link(store, model, link))
        .collect();
    (model, links)
}

// ===========================================================================
// Elements
// ===========================================================================

/// A `<plugin>` element for a detachable joint with the three required
/// parameters set.
pub fn joint_element(parent_link: &str, child_model: &str, child_link: &str) -> Element {
    Element::new("plugin")
        .with_param("parent_link", parent_link)
        .with_param("child_model", child_model)
        .with_param("child_link", child_link)
}
