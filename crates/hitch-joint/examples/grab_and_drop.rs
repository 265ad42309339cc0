//! Grab-and-drop example: a gripper holds a crate until told to let go.
//!
//! Builds a robot and a crate by hand, fixes the crate's lid to the robot's
//! gripper with a `DetachableJoint`, steps the simulation, then publishes a
//! detach command from another thread.
//!
//! Run with: `RUST_LOG=debug cargo run -p hitch-joint --example grab_and_drop`

use std::sync::Arc;

use hitch_core::element::Element;
use hitch_core::events::RemoveFromStore;
use hitch_core::id::Entity;
use hitch_core::runner::Runner;
use hitch_core::store::EntityStore;
use hitch_core::transport::{LocalTransport, Message};
use hitch_joint::DetachableJoint;

fn spawn(store: &mut EntityStore, name: &str, parent: Option<Entity>) -> Entity {
    let entity = store.create_entity();
    match parent {
        Some(model) => {
            store.add_link(entity);
            store.set_parent(entity, model);
        }
        None => store.add_model(entity),
    }
    store.set_name(entity, name);
    entity
}

fn main() {
    env_logger::init();

    let transport = Arc::new(LocalTransport::new());
    let mut runner = Runner::default();

    // --- Scene: robot with a gripper, crate with a lid ---

    let robot = spawn(&mut runner.store, "robot", None);
    spawn(&mut runner.store, "gripper", Some(robot));
    let crate_model = spawn(&mut runner.store, "crate", None);
    spawn(&mut runner.store, "lid", Some(crate_model));

    runner
        .events()
        .connect::<RemoveFromStore, _>(|id| println!("  store: removed entity {id:#x}"));

    // --- Joint ---

    let plugin = Element::new("plugin")
        .with_param("parent_link", "gripper")
        .with_param("child_model", "crate")
        .with_param("child_link", "lid");
    let idx = runner.add_system(Box::new(DetachableJoint::new(transport.clone())), robot, &plugin);

    runner.run(3);
    let joint = runner.system::<DetachableJoint>(idx).unwrap();
    println!(
        "after {} steps: joint {:?}, listening on {}",
        runner.info().iterations,
        joint.joint_entity(),
        joint.topic()
    );
    let topic = joint.topic().to_string();

    // --- Drop ---

    let t = Arc::clone(&transport);
    std::thread::spawn(move || t.publish(&topic, &Message::empty()).unwrap())
        .join()
        .unwrap();
    runner.step();

    let joint = runner.system::<DetachableJoint>(idx).unwrap();
    println!(
        "after {} steps: joint {:?}, {} detachable joint(s) left",
        runner.info().iterations,
        joint.joint_entity(),
        runner.store.detachable_joints().count()
    );
}
