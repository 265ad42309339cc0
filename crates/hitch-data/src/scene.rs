//! Spawning a [`SceneData`] into an [`EntityStore`].

use crate::loader::DataLoadError;
use crate::schema::SceneData;
use hitch_core::element::Element;
use hitch_core::event::EventManager;
use hitch_core::events::{AddToStore, LoadPlugins, PluginLoad, StoreAddition};
use hitch_core::id::Entity;
use hitch_core::store::{EntityQuery, EntityStore};
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

/// A plugin waiting to be configured on the model it was declared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlugin {
    pub model: Entity,
    pub element: Element,
}

/// Create every model and link of `scene` in `store` and announce each one
/// on [`AddToStore`]. Top-level models are announced with parent `0`, which
/// no live entity id takes. Each model's `<model>` element, with its
/// `<plugin>` children, is then announced on [`LoadPlugins`].
///
/// Names are validated before anything is spawned, so an error leaves the
/// store untouched. Model names must be unique across the scene and the
/// store; link names must be unique within their model.
pub fn spawn_scene(
    store: &mut EntityStore,
    scene: &SceneData,
    events: &EventManager,
) -> Result<Vec<PendingPlugin>, DataLoadError> {
    validate(store, scene)?;

    let mut plugins = Vec::new();
    for model_data in &scene.models {
        let model = store.create_entity();
        store.add_model(model);
        store.set_name(model, model_data.name.as_str());
        events.emit::<AddToStore>(&StoreAddition {
            entity: model.to_raw(),
            name: model_data.name.clone(),
            parent: 0,
        });

        for link_name in &model_data.links {
            let link = store.create_entity();
            store.add_link(link);
            store.set_name(link, link_name.as_str());
            store.set_parent(link, model);
            events.emit::<AddToStore>(&StoreAddition {
                entity: link.to_raw(),
                name: link_name.clone(),
                parent: model.to_raw(),
            });
        }
        debug!(
            "spawned model '{}' with {} link(s)",
            model_data.name,
            model_data.links.len()
        );

        let element = model_data.to_element();
        plugins.extend(element.children_named("plugin").map(|plugin| PendingPlugin {
            model,
            element: plugin.clone(),
        }));
        events.emit::<LoadPlugins>(&PluginLoad {
            entity: model,
            element: Arc::new(element),
        });
    }
    Ok(plugins)
}

fn validate(store: &EntityStore, scene: &SceneData) -> Result<(), DataLoadError> {
    let mut models = HashSet::new();
    for model in &scene.models {
        let taken = store
            .entity_by_components(&EntityQuery::model().named(&model.name))
            .is_some();
        if taken || !models.insert(model.name.as_str()) {
            return Err(DataLoadError::DuplicateName {
                kind: "model",
                name: model.name.clone(),
            });
        }
        let mut links = HashSet::new();
        if let Some(dup) = model.links.iter().find(|l| !links.insert(l.as_str())) {
            return Err(DataLoadError::DuplicateName {
                kind: "link",
                name: dup.clone(),
            });
        }
    }
    Ok(())
}
