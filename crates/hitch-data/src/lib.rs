//! Scene data loading for the Hitch runtime.
//!
//! Reads a scene file (RON, JSON or TOML, chosen by extension), spawns its
//! models and links into an [`EntityStore`](hitch_core::store::EntityStore)
//! and hands back the plugins to configure.

pub mod loader;
pub mod scene;
pub mod schema;

use std::path::Path;

pub use loader::{DataLoadError, Format};
pub use scene::{PendingPlugin, spawn_scene};
pub use schema::SceneData;

/// Base name of the scene file looked up by [`load_scene_dir`].
pub const SCENE_FILE: &str = "scene";

/// Load a scene from `path`.
pub fn load_scene(path: &Path) -> Result<SceneData, DataLoadError> {
    let scene: SceneData = loader::deserialize_file(path)?;
    log::info!(
        "loaded scene {} with {} model(s)",
        path.display(),
        scene.models.len()
    );
    Ok(scene)
}

/// Load `scene.{ron,toml,json}` from `dir`. Exactly one must exist.
pub fn load_scene_dir(dir: &Path) -> Result<SceneData, DataLoadError> {
    load_scene(&loader::require_data_file(dir, SCENE_FILE)?)
}
