//! A system that holds two links together with a fixed joint until a
//! detach command arrives.
//!
//! # Lifecycle
//!
//! 1. **Configure** -- resolve the owning model and parent link, read the
//!    [`JointSpec`], pick the command topic. Any failure leaves the
//!    instance permanently inert.
//! 2. **Discovery** -- every step until it succeeds, look for the child
//!    model and child link. They may be spawned after this system, so
//!    there is no retry cap.
//! 3. **Attached** -- a joint entity carrying a
//!    [`DetachableJointComponent`] exists and the command topic is
//!    subscribed.
//! 4. **Detached** -- the first step after a detach command requests
//!    removal of the joint entity. The instance is single-use: it never
//!    re-attaches.
//!
//! The command callback runs on transport threads and only flips an
//! atomic flag. The store is touched exclusively from `pre_update`.

use crate::config::{JointConfigError, JointSpec};
use hitch_core::component::DetachableJointComponent;
use hitch_core::element::Element;
use hitch_core::event::EventManager;
use hitch_core::id::Entity;
use hitch_core::model::Model;
use hitch_core::store::{EntityQuery, EntityStore};
use hitch_core::system::{System, UpdateInfo};
use hitch_core::transport::{Message, TransportNode, valid_topic};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ---------------------------------------------------------------------------
// DetachHandle
// ---------------------------------------------------------------------------

/// Cloneable, thread-safe trigger for the pending-detach flag of one
/// [`DetachableJoint`]. Repeated requests before the next step coalesce.
#[derive(Debug, Clone)]
pub struct DetachHandle {
    requested: Arc<AtomicBool>,
}

impl DetachHandle {
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Transport entry point. The message content is ignored.
    pub fn on_message(&self, _message: &Message) {
        self.request();
    }
}

// ---------------------------------------------------------------------------
// DetachableJoint
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DetachableJoint {
    transport: Arc<dyn TransportNode>,
    model: Option<Model>,
    spec: Option<JointSpec>,
    topic: String,

    /// Set by the first `configure` call, whatever its outcome.
    configured: bool,
    valid_config: bool,
    initialized: bool,

    parent_link_entity: Option<Entity>,
    child_link_entity: Option<Entity>,
    /// Some iff attached and the detach has not been processed yet.
    joint_entity: Option<Entity>,

    /// Set from transport threads, cleared by `pre_update`.
    detach_requested: Arc<AtomicBool>,
}

impl DetachableJoint {
    /// A joint that will subscribe to its command topic on `transport`.
    pub fn new(transport: Arc<dyn TransportNode>) -> Self {
        Self {
            transport,
            model: None,
            spec: None,
            topic: String::new(),
            configured: false,
            valid_config: false,
            initialized: false,
            parent_link_entity: None,
            child_link_entity: None,
            joint_entity: None,
            detach_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_valid_config(&self) -> bool {
        self.valid_config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn joint_entity(&self) -> Option<Entity> {
        self.joint_entity
    }

    pub fn parent_link_entity(&self) -> Option<Entity> {
        self.parent_link_entity
    }

    pub fn child_link_entity(&self) -> Option<Entity> {
        self.child_link_entity
    }

    pub fn is_detach_requested(&self) -> bool {
        self.detach_requested.load(Ordering::SeqCst)
    }

    /// The command topic; empty until configured.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn spec(&self) -> Option<&JointSpec> {
        self.spec.as_ref()
    }

    pub fn detach_handle(&self) -> DetachHandle {
        DetachHandle {
            requested: Arc::clone(&self.detach_requested),
        }
    }

    /// Same as a message arriving on the command topic.
    pub fn on_detach_command(&self, message: &Message) {
        self.detach_handle().on_message(message);
    }

    // -----------------------------------------------------------------------
    // Configure
    // -----------------------------------------------------------------------

    fn try_configure(
        &mut self,
        entity: Entity,
        element: &Element,
        store: &EntityStore,
    ) -> Result<(), JointConfigError> {
        let model = Model::new(entity);
        if !model.valid(store) {
            return Err(JointConfigError::NotAModel(entity));
        }

        let spec = JointSpec::from_element(element)?;

        let parent_link = model
            .link_by_name(store, &spec.parent_link)
            .ok_or_else(|| JointConfigError::ParentLinkNotFound {
                link: spec.parent_link.clone(),
                model: model.name(store).to_string(),
            })?;

        let candidates = spec.topic_candidates(model.name(store));
        let topic =
            valid_topic(&candidates).ok_or(JointConfigError::NoValidTopic { candidates })?;

        self.model = Some(model);
        self.parent_link_entity = Some(parent_link);
        self.topic = topic;
        self.spec = Some(spec);
        self.valid_config = true;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// One discovery attempt. Warns and returns on a miss; the next step
    /// tries again.
    fn discover(&mut self, store: &mut EntityStore) {
        let (Some(spec), Some(model)) = (&self.spec, self.model) else {
            return;
        };

        let child_model = if spec.child_is_self() {
            Some(model.entity())
        } else {
            store.entity_by_components(&EntityQuery::model().named(&spec.child_model))
        };
        let Some(child_model) = child_model else {
            if !spec.suppress_child_warning {
                warn!("Child Model {} could not be found.", spec.child_model);
            }
            return;
        };

        let child_link = store.entity_by_components(
            &EntityQuery::link()
                .child_of(child_model)
                .named(&spec.child_link),
        );
        let Some(child_link) = child_link else {
            warn!("Child Link {} could not be found.", spec.child_link);
            return;
        };

        self.attach(store, child_link);
    }

    fn attach(&mut self, store: &mut EntityStore, child_link: Entity) {
        let Some(parent_link) = self.parent_link_entity else {
            return;
        };

        let joint = store.create_entity();
        store.set_detachable_joint(joint, DetachableJointComponent::fixed(parent_link, child_link));
        self.child_link_entity = Some(child_link);
        self.joint_entity = Some(joint);

        let handle = self.detach_handle();
        match self.transport.subscribe(
            &self.topic,
            Arc::new(move |message: &Message| handle.on_message(message)),
        ) {
            Ok(()) => info!("DetachableJoint subscribing to messages on [{}]", self.topic),
            Err(err) => error!("DetachableJoint could not subscribe to [{}]: {err}", self.topic),
        }

        self.initialized = true;
    }

    // -----------------------------------------------------------------------
    // Detach
    // -----------------------------------------------------------------------

    fn process_detach(&mut self, store: &mut EntityStore) {
        let Some(joint) = self.joint_entity else {
            return;
        };
        if !self.detach_requested.swap(false, Ordering::SeqCst) {
            return;
        }
        debug!("Removing entity: {joint:?}");
        store.request_remove_entity(joint);
        self.joint_entity = None;
    }
}

impl System for DetachableJoint {
    fn name(&self) -> &str {
        "detachable_joint"
    }

    fn configure(
        &mut self,
        entity: Entity,
        element: &Element,
        store: &mut EntityStore,
        _events: &EventManager,
    ) {
        if self.configured {
            warn!("DetachableJoint is already configured; ignoring second configuration");
            return;
        }
        self.configured = true;
        if let Err(err) = self.try_configure(entity, element, store) {
            error!("{err}. Failed to initialize.");
        }
    }

    fn pre_update(&mut self, _info: &UpdateInfo, store: &mut EntityStore) {
        if self.valid_config && !self.initialized {
            self.discover(store);
        }
        if self.initialized {
            self.process_detach(store);
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
