//! Detachable joints for the Hitch runtime.
//!
//! A [`DetachableJoint`] is a per-model system that fixes a link of its own
//! model to a link of another model (or of the same model), and removes
//! that joint when a message arrives on its command topic. Configuration
//! comes from a `<plugin>` element parsed into a [`JointSpec`]; the child
//! may appear in the store any number of steps after configuration.
//!
//! ```text
//! configure ──▶ discovery (every step) ──▶ attached ──▶ detached
//!     │                                       ▲
//!     └── error: inert forever                └── command topic
//! ```

pub mod config;
pub mod detachable;

pub use config::{JointConfigError, JointSpec, default_topic};
pub use detachable::{DetachHandle, DetachableJoint};
