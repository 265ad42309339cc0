//! Lifecycle events shared by every subsystem.
//!
//! Each type here is a channel marker for [`EventManager`](crate::event::EventManager).
//! Several carry the same payload type; they are still separate channels.
//!
//! ```rust,ignore
//! events.connect::<Pause, _>(|paused| log::info!("paused: {paused}"));
//! events.emit::<Pause>(&true);
//! ```

use crate::element::Element;
use crate::event::Event;
use crate::id::Entity;
use crate::store::EntityStore;
use crate::system::UpdateInfo;
use std::sync::Arc;

/// Emit `true` to pause the simulation, `false` to resume it.
#[derive(Debug)]
pub struct Pause;

impl Event for Pause {
    type Payload = bool;
}

/// Terminates an active simulation.
#[derive(Debug)]
pub struct Stop;

impl Event for Stop {
    type Payload = ();
}

/// Asks the plugin loader to load the `<plugin>` children of `element` for
/// `entity`.
#[derive(Debug)]
pub struct LoadPlugins;

#[derive(Debug, Clone)]
pub struct PluginLoad {
    pub entity: Entity,
    pub element: Arc<Element>,
}

impl Event for LoadPlugins {
    type Payload = PluginLoad;
}

/// Render tick for single-process setups where sensors and the GUI share a
/// scene.
#[derive(Debug)]
pub struct Render;

impl Event for Render {
    type Payload = ();
}

#[derive(Debug)]
pub struct EnableSensors;

impl Event for EnableSensors {
    type Payload = bool;
}

/// Removes an entity (by raw id) from a mirrored store independently of
/// the mirror's refresh rate.
#[derive(Debug)]
pub struct RemoveFromStore;

impl Event for RemoveFromStore {
    type Payload = u64;
}

/// Adds an entity (by raw id) with a name and parent to a mirrored store.
#[derive(Debug)]
pub struct AddToStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAddition {
    pub entity: u64,
    pub name: String,
    pub parent: u64,
}

impl Event for AddToStore {
    type Payload = StoreAddition;
}

/// Hands the GUI a read-only snapshot of the store after a step.
#[derive(Debug)]
pub struct SyncStoreToGui;

#[derive(Debug, Clone)]
pub struct GuiSync {
    pub snapshot: Arc<EntityStore>,
    pub info: UpdateInfo,
}

impl Event for SyncStoreToGui {
    type Payload = GuiSync;
}
