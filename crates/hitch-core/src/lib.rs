//! Hitch Core -- the shared runtime for jointed-body simulation systems.
//!
//! This crate provides the entity store that systems read and mutate, the
//! typed event bus that lets subsystems react to lifecycle changes without
//! knowing about each other, the message transport systems subscribe to,
//! and the step driver that ties them together.
//!
//! # Step Pipeline
//!
//! Each call to [`runner::Runner::step`] runs:
//!
//! 1. **Pre-update** -- every [`system::System`] sees the store once.
//! 2. **Removal** -- removal requests made during pre-update are applied.
//! 3. **GUI sync** -- listeners on [`events::SyncStoreToGui`] get a snapshot.
//! 4. **Bookkeeping** -- iteration counter and sim time advance.
//!
//! # Key Types
//!
//! - [`store::EntityStore`] -- Entities plus SoA component storage with
//!   deferred removal.
//! - [`model::Model`] -- Read helper for model entities and their links.
//! - [`event::EventManager`] -- Registry of marker-typed event channels.
//! - [`events`] -- The lifecycle channels (pause, stop, render, ...).
//! - [`transport::TransportNode`] -- Topic subscription interface;
//!   [`transport::LocalTransport`] is the in-process implementation.
//! - [`element::Element`] -- Declarative configuration handed to systems.

pub mod component;
pub mod element;
pub mod event;
pub mod events;
pub mod id;
pub mod model;
pub mod runner;
pub mod store;
pub mod system;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
