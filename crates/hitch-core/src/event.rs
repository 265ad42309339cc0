//! Typed event channels with synchronous delivery.
//!
//! Every event is a marker type implementing [`Event`]; its associated
//! `Payload` is what listeners receive. Two events with the same payload
//! type are still separate channels because their markers differ, so a
//! listener for [`Pause`](crate::events::Pause) can never be wired to
//! [`EnableSensors`](crate::events::EnableSensors) by accident.
//!
//! # Delivery
//!
//! [`EventChannel::emit`] invokes every connected listener on the calling
//! thread, in connection order. The listener list is snapshotted under a
//! read lock and the lock is released before any listener runs, so
//! listeners may connect or disconnect freely:
//!
//! - A listener disconnected during an emission is not invoked later in
//!   that emission.
//! - A listener connected during an emission is first invoked by the next
//!   emission.
//!
//! A panicking listener unwinds through `emit`; listeners after it do not
//! run for that emission.
//!
//! # Registry
//!
//! [`EventManager`] holds one channel per marker type, created lazily on
//! first connect. Emitting on a channel nobody connected to is a no-op.

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Event trait
// ---------------------------------------------------------------------------

/// A distinct notification channel identity.
pub trait Event: 'static {
    /// Data handed to every listener.
    type Payload: 'static;
}

// ---------------------------------------------------------------------------
// Connection handle
// ---------------------------------------------------------------------------

/// Identifies one listener on the channel of `E`.
pub struct Connection<E: Event> {
    id: u64,
    _event: PhantomData<fn() -> E>,
}

impl<E: Event> Clone for Connection<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Event> Copy for Connection<E> {}

impl<E: Event> PartialEq for Connection<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Event> Eq for Connection<E> {}

impl<E: Event> std::fmt::Debug for Connection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("event", &std::any::type_name::<E>())
            .field("id", &self.id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EventChannel
// ---------------------------------------------------------------------------

type Callback<P> = Box<dyn Fn(&P) + Send + Sync>;

struct ListenerEntry<E: Event> {
    id: u64,
    /// Cleared on disconnect; checked before every invocation.
    connected: AtomicBool,
    callback: Callback<E::Payload>,
}

/// The listener list for one event type.
pub struct EventChannel<E: Event> {
    listeners: RwLock<Vec<Arc<ListenerEntry<E>>>>,
    next_id: AtomicU64,
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> std::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("event", &std::any::type_name::<E>())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E: Event> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register `listener`. Listeners run in connection order.
    pub fn connect<F>(&self, listener: F) -> Connection<E>
    where
        F: Fn(&E::Payload) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().push(Arc::new(ListenerEntry {
            id,
            connected: AtomicBool::new(true),
            callback: Box::new(listener),
        }));
        Connection {
            id,
            _event: PhantomData,
        }
    }

    /// Remove the listener behind `connection`. Returns `false` if it was
    /// already gone.
    pub fn disconnect(&self, connection: Connection<E>) -> bool {
        let mut listeners = self.listeners.write();
        let Some(pos) = listeners.iter().position(|l| l.id == connection.id) else {
            return false;
        };
        let entry = listeners.remove(pos);
        entry.connected.store(false, Ordering::SeqCst);
        true
    }

    /// Invoke every connected listener with `payload`. Returns how many ran.
    pub fn emit(&self, payload: &E::Payload) -> usize {
        let snapshot: Vec<Arc<ListenerEntry<E>>> = self.listeners.read().clone();
        let mut invoked = 0;
        for entry in &snapshot {
            if !entry.connected.load(Ordering::SeqCst) {
                continue;
            }
            (entry.callback)(payload);
            invoked += 1;
        }
        invoked
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_connected(&self, connection: Connection<E>) -> bool {
        self.listeners.read().iter().any(|l| l.id == connection.id)
    }
}

// ---------------------------------------------------------------------------
// EventManager
// ---------------------------------------------------------------------------

/// Registry of event channels keyed by marker type.
#[derive(Default)]
pub struct EventManager {
    channels: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("channels", &self.channels.read().len())
            .finish()
    }
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel for `E`, created on first use.
    pub fn channel<E: Event>(&self) -> Arc<EventChannel<E>> {
        if let Some(channel) = self.existing_channel::<E>() {
            return channel;
        }
        let mut channels = self.channels.write();
        // Another thread may have created it between the two locks.
        if let Some(channel) = channels
            .get(&TypeId::of::<E>())
            .and_then(|c| Arc::clone(c).downcast::<EventChannel<E>>().ok())
        {
            return channel;
        }
        let channel = Arc::new(EventChannel::<E>::new());
        channels.insert(TypeId::of::<E>(), channel.clone());
        channel
    }

    fn existing_channel<E: Event>(&self) -> Option<Arc<EventChannel<E>>> {
        self.channels
            .read()
            .get(&TypeId::of::<E>())
            .and_then(|c| Arc::clone(c).downcast::<EventChannel<E>>().ok())
    }

    pub fn connect<E, F>(&self, listener: F) -> Connection<E>
    where
        E: Event,
        F: Fn(&E::Payload) + Send + Sync + 'static,
    {
        self.channel::<E>().connect(listener)
    }

    /// Idempotent; safe to call from inside a listener.
    pub fn disconnect<E: Event>(&self, connection: Connection<E>) -> bool {
        self.existing_channel::<E>()
            .is_some_and(|channel| channel.disconnect(connection))
    }

    /// Emit on the channel of `E`. Returns how many listeners ran.
    pub fn emit<E: Event>(&self, payload: &E::Payload) -> usize {
        // Clone the channel out so the registry lock is not held while
        // listeners run.
        match self.existing_channel::<E>() {
            Some(channel) => channel.emit(payload),
            None => 0,
        }
    }

    pub fn listener_count<E: Event>(&self) -> usize {
        self.existing_channel::<E>()
            .map_or(0, |channel| channel.listener_count())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
