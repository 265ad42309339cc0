//! The step driver: owns the entity store and runs every system once per
//! step.
//!
//! # Step pipeline
//!
//! Each [`Runner::step`] runs:
//! 1. **Pre-update** -- every system's `pre_update`, in registration order.
//! 2. **Removal** -- apply removal requests made during pre-update and
//!    announce them on [`RemoveFromStore`].
//! 3. **GUI sync** -- if anyone listens on [`SyncStoreToGui`], hand them a
//!    snapshot of the store.
//! 4. **Bookkeeping** -- advance the iteration counter and sim time.
//!
//! The runner listens on [`Pause`] and [`Stop`], so any component holding
//! the shared [`EventManager`] can pause, resume or stop it.

use crate::element::Element;
use crate::event::{Connection, EventManager};
use crate::events::{GuiSync, Pause, RemoveFromStore, Stop, SyncStoreToGui};
use crate::id::Entity;
use crate::store::EntityStore;
use crate::system::{System, UpdateInfo};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default step size: 1 ms.
pub const DEFAULT_STEP: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct Runner {
    /// The shared entity store. Only mutated from the step context.
    pub store: EntityStore,
    events: Arc<EventManager>,
    systems: Vec<Box<dyn System>>,
    info: UpdateInfo,
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    pause_connection: Connection<Pause>,
    stop_connection: Connection<Stop>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl Runner {
    /// A runner with its own event manager.
    pub fn new(dt: Duration) -> Self {
        Self::with_events(Arc::new(EventManager::new()), dt)
    }

    /// A runner sharing `events` with other components.
    pub fn with_events(events: Arc<EventManager>, dt: Duration) -> Self {
        let paused = Arc::new(AtomicBool::new(false));
        let stopped = Arc::new(AtomicBool::new(false));

        let p = Arc::clone(&paused);
        let pause_connection = events.connect::<Pause, _>(move |&pause| {
            if p.swap(pause, Ordering::SeqCst) != pause {
                info!("simulation {}", if pause { "paused" } else { "resumed" });
            }
        });
        let s = Arc::clone(&stopped);
        let stop_connection = events.connect::<Stop, _>(move |_| {
            if !s.swap(true, Ordering::SeqCst) {
                info!("simulation stop requested");
            }
        });

        Self {
            store: EntityStore::new(),
            events,
            systems: Vec::new(),
            info: UpdateInfo {
                dt,
                ..UpdateInfo::default()
            },
            paused,
            stopped,
            pause_connection,
            stop_connection,
        }
    }

    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    /// Timing information for the next step.
    pub fn info(&self) -> &UpdateInfo {
        &self.info
    }

    // -----------------------------------------------------------------------
    // Systems
    // -----------------------------------------------------------------------

    /// Configure `system` for `entity` and append it to the pipeline.
    /// Returns its index.
    pub fn add_system(
        &mut self,
        mut system: Box<dyn System>,
        entity: Entity,
        element: &Element,
    ) -> usize {
        debug!("configuring system '{}'", system.name());
        system.configure(entity, element, &mut self.store, &self.events);
        self.systems.push(system);
        self.systems.len() - 1
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// The system at `index`, downcast to `T`.
    pub fn system<T: 'static>(&self, index: usize) -> Option<&T> {
        self.systems.get(index)?.as_any().downcast_ref::<T>()
    }

    pub fn system_mut<T: 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.systems.get_mut(index)?.as_any_mut().downcast_mut::<T>()
    }

    // -----------------------------------------------------------------------
    // Pause / Stop
    // -----------------------------------------------------------------------

    pub fn pause(&self) {
        self.events.emit::<Pause>(&true);
    }

    pub fn resume(&self) {
        self.events.emit::<Pause>(&false);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Run one step. Returns `false` without doing anything while paused or
    /// after a stop.
    pub fn step(&mut self) -> bool {
        if self.is_stopped() || self.is_paused() {
            return false;
        }
        let info = self.info;

        for system in &mut self.systems {
            system.pre_update(&info, &mut self.store);
        }

        for entity in self.store.process_removals() {
            debug!("removed entity {entity:?}");
            self.events.emit::<RemoveFromStore>(&entity.to_raw());
        }

        if self.events.listener_count::<SyncStoreToGui>() > 0 {
            self.events.emit::<SyncStoreToGui>(&GuiSync {
                snapshot: Arc::new(self.store.clone()),
                info,
            });
        }

        self.info.iterations += 1;
        self.info.sim_time += self.info.dt;
        true
    }

    /// Run up to `steps` steps, ending early on pause or stop. Returns the
    /// number of steps run.
    pub fn run(&mut self, steps: u64) -> u64 {
        let mut run = 0;
        while run < steps && self.step() {
            run += 1;
        }
        run
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.events.disconnect(self.pause_connection);
        self.events.disconnect(self.stop_connection);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
