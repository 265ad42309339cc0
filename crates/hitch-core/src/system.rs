//! System trait for extending the step driver with custom behaviors.
//!
//! Systems are configured once with the entity that owns them and its
//! declarative [`Element`], then called once per step with the shared
//! [`EntityStore`]. Both hooks default to no-ops, so a system only
//! overrides what it needs.

use crate::element::Element;
use crate::event::EventManager;
use crate::id::Entity;
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// UpdateInfo
// ---------------------------------------------------------------------------

/// Timing information for the step being run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// Number of steps completed before this one.
    pub iterations: u64,
    /// Simulated time at the start of this step.
    pub sim_time: Duration,
    /// Simulated time advanced by one step.
    pub dt: Duration,
}

// ---------------------------------------------------------------------------
// System trait
// ---------------------------------------------------------------------------

pub trait System: std::fmt::Debug + Send {
    /// The human-readable name of this system, used for lookup and logging.
    fn name(&self) -> &str;

    /// Called once, before the first step.
    fn configure(
        &mut self,
        entity: Entity,
        element: &Element,
        store: &mut EntityStore,
        events: &EventManager,
    ) {
        let _ = (entity, element, store, events);
    }

    /// Called once per step, before physics consumes the store.
    fn pre_update(&mut self, info: &UpdateInfo, store: &mut EntityStore) {
        let _ = (info, store);
    }

    /// Downcast to `&dyn Any` for type-safe access to concrete system types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Downcast to `&mut dyn Any` for type-safe mutable access to concrete system types.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
