//! Property-based tests for the Hitch core runtime.
//!
//! Uses proptest to generate random listener and store operation sequences,
//! then verify the event bus and the entity store keep their invariants.

use hitch_core::event::{Connection, Event, EventManager};
use hitch_core::store::EntityStore;
use hitch_core::test_utils::*;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug)]
struct Ping;

impl Event for Ping {
    type Payload = u32;
}

#[derive(Debug)]
struct Pong;

impl Event for Pong {
    type Payload = u32;
}

#[derive(Debug, Clone)]
enum BusOp {
    ConnectPing,
    ConnectPong,
    /// Disconnect the n-th connection ever made (mod count).
    Disconnect(usize),
    EmitPing(u32),
    EmitPong(u32),
}

fn arb_bus_ops(max_ops: usize) -> impl Strategy<Value = Vec<BusOp>> {
    proptest::collection::vec(
        prop_oneof![
            Just(BusOp::ConnectPing),
            Just(BusOp::ConnectPong),
            (0..32usize).prop_map(BusOp::Disconnect),
            any::<u32>().prop_map(BusOp::EmitPing),
            any::<u32>().prop_map(BusOp::EmitPong),
        ],
        1..=max_ops,
    )
}

#[derive(Debug, Clone)]
enum StoreOp {
    SpawnModel(u8),
    RequestRemove(usize),
    Process,
}

fn arb_store_ops(max_ops: usize) -> impl Strategy<Value = Vec<StoreOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..8u8).prop_map(StoreOp::SpawnModel),
            (0..64usize).prop_map(StoreOp::RequestRemove),
            Just(StoreOp::Process),
        ],
        1..=max_ops,
    )
}

/// A connection on either channel, plus the listener's label.
#[derive(Debug, Clone, Copy)]
enum AnyConnection {
    Ping(Connection<Ping>, usize),
    Pong(Connection<Pong>, usize),
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every emission reaches exactly the live listeners of its own channel,
    /// in connection order, carrying the emitted payload.
    #[test]
    fn emission_reaches_live_listeners_in_order(ops in arb_bus_ops(60)) {
        let events = EventManager::new();
        let log: Arc<Mutex<Vec<(usize, u32)>>> = Arc::new(Mutex::new(Vec::new()));
        let mut made: Vec<AnyConnection> = Vec::new();
        let mut live_ping: Vec<usize> = Vec::new();
        let mut live_pong: Vec<usize> = Vec::new();

        for op in ops {
            match op {
                BusOp::ConnectPing => {
                    let label = made.len();
                    let l = Arc::clone(&log);
                    let c = events.connect::<Ping, _>(move |v| l.lock().push((label, *v)));
                    made.push(AnyConnection::Ping(c, label));
                    live_ping.push(label);
                }
                BusOp::ConnectPong => {
                    let label = made.len();
                    let l = Arc::clone(&log);
                    let c = events.connect::<Pong, _>(move |v| l.lock().push((label, *v)));
                    made.push(AnyConnection::Pong(c, label));
                    live_pong.push(label);
                }
                BusOp::Disconnect(n) if !made.is_empty() => {
                    match made[n % made.len()] {
                        AnyConnection::Ping(c, label) => {
                            let was_live = live_ping.contains(&label);
                            prop_assert_eq!(events.disconnect(c), was_live);
                            live_ping.retain(|&l| l != label);
                        }
                        AnyConnection::Pong(c, label) => {
                            let was_live = live_pong.contains(&label);
                            prop_assert_eq!(events.disconnect(c), was_live);
                            live_pong.retain(|&l| l != label);
                        }
                    }
                }
                BusOp::Disconnect(_) => {}
                BusOp::EmitPing(v) => {
                    log.lock().clear();
                    prop_assert_eq!(events.emit::<Ping>(&v), live_ping.len());
                    let expected: Vec<_> = live_ping.iter().map(|&l| (l, v)).collect();
                    prop_assert_eq!(&*log.lock(), &expected);
                }
                BusOp::EmitPong(v) => {
                    log.lock().clear();
                    prop_assert_eq!(events.emit::<Pong>(&v), live_pong.len());
                    let expected: Vec<_> = live_pong.iter().map(|&l| (l, v)).collect();
                    prop_assert_eq!(&*log.lock(), &expected);
                }
            }
            prop_assert_eq!(events.listener_count::<Ping>(), live_ping.len());
            prop_assert_eq!(events.listener_count::<Pong>(), live_pong.len());
        }
    }

    /// Removal requests never take effect before `process_removals`, and
    /// after it every requested entity is gone while the rest survive.
    #[test]
    fn removals_are_deferred_and_exact(ops in arb_store_ops(80)) {
        let mut store = EntityStore::new();
        let mut spawned = Vec::new();
        let mut requested = Vec::new();

        for op in ops {
            match op {
                StoreOp::SpawnModel(n) => {
                    spawned.push(spawn_model(&mut store, &format!("m{n}")));
                }
                StoreOp::RequestRemove(i) if !spawned.is_empty() => {
                    let entity = spawned[i % spawned.len()];
                    let before = store.entity_count();
                    store.request_remove_entity(entity);
                    prop_assert_eq!(store.entity_count(), before);
                    if store.has_entity(entity) && !requested.contains(&entity) {
                        requested.push(entity);
                    }
                }
                StoreOp::RequestRemove(_) => {}
                StoreOp::Process => {
                    let removed = store.process_removals();
                    prop_assert_eq!(&removed, &requested);
                    for e in &removed {
                        prop_assert!(!store.has_entity(*e));
                    }
                    spawned.retain(|e| !removed.contains(e));
                    requested.clear();
                }
            }
            prop_assert_eq!(store.pending_removals(), requested.as_slice());
            for e in &spawned {
                prop_assert!(store.has_entity(*e));
            }
        }
    }
}
