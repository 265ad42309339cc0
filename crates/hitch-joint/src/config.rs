//! Declarative parameters of a detachable joint.

use hitch_core::element::{Element, ElementError};
use hitch_core::id::Entity;

/// Value of `child_model` that refers to the model owning the joint.
pub const SELF_MODEL: &str = "__model__";

pub const PARENT_LINK: &str = "parent_link";
pub const CHILD_MODEL: &str = "child_model";
pub const CHILD_LINK: &str = "child_link";
pub const TOPIC: &str = "topic";
pub const SUPPRESS_CHILD_WARNING: &str = "suppress_child_warning";

/// Errors that permanently disable a joint instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JointConfigError {
    #[error("DetachableJoint should be attached to a model entity")]
    NotAModel(Entity),
    #[error("'{0}' is a required parameter for DetachableJoint")]
    MissingParameter(&'static str),
    #[error(transparent)]
    InvalidParameter(#[from] ElementError),
    #[error("link with name {link} not found in model {model}; check the 'parent_link' parameter")]
    ParentLinkNotFound { link: String, model: String },
    #[error("none of the candidate topics {candidates:?} is valid")]
    NoValidTopic { candidates: Vec<String> },
}

/// The parsed `<plugin>` element of a detachable joint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointSpec {
    pub parent_link: String,
    pub child_model: String,
    pub child_link: String,
    /// Overrides the default command topic when set.
    pub topic: Option<String>,
    /// Silences the "child model not found" warning. Has no effect on the
    /// "child link not found" warning.
    pub suppress_child_warning: bool,
}

impl JointSpec {
    /// Read the joint parameters from `element`. Required parameters are
    /// checked in declaration order, so the first missing one is reported.
    pub fn from_element(element: &Element) -> Result<Self, JointConfigError> {
        let parent_link = required(element, PARENT_LINK)?;
        let child_model = required(element, CHILD_MODEL)?;
        let child_link = required(element, CHILD_LINK)?;
        Ok(Self {
            parent_link,
            child_model,
            child_link,
            topic: element.get::<String>(TOPIC)?,
            suppress_child_warning: element.get_or(SUPPRESS_CHILD_WARNING, false)?,
        })
    }

    /// Whether the child is the owning model itself.
    pub fn child_is_self(&self) -> bool {
        self.child_model == SELF_MODEL
    }

    /// Command topic candidates, most preferred first.
    pub fn topic_candidates(&self, model_name: &str) -> Vec<String> {
        self.topic
            .iter()
            .cloned()
            .chain(std::iter::once(default_topic(model_name)))
            .collect()
    }
}

fn required(element: &Element, key: &'static str) -> Result<String, JointConfigError> {
    element
        .get::<String>(key)?
        .ok_or(JointConfigError::MissingParameter(key))
}

/// `/model/<model>/detachable_joint/detach`
pub fn default_topic(model_name: &str) -> String {
    format!("/model/{model_name}/detachable_joint/detach")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hitch_core::test_utils::joint_element;

    #[test]
    fn parses_required_and_optional_parameters() {
        let el = joint_element("base", "crate", "lid")
            .with_param(TOPIC, "/custom")
            .with_param(SUPPRESS_CHILD_WARNING, true);
        let spec = JointSpec::from_element(&el).unwrap();
        assert_eq!(spec.parent_link, "base");
        assert_eq!(spec.child_model, "crate");
        assert_eq!(spec.child_link, "lid");
        assert_eq!(spec.topic.as_deref(), Some("/custom"));
        assert!(spec.suppress_child_warning);
        assert!(!spec.child_is_self());
    }

    #[test]
    fn optional_parameters_default() {
        let spec = JointSpec::from_element(&joint_element("base", SELF_MODEL, "arm")).unwrap();
        assert_eq!(spec.topic, None);
        assert!(!spec.suppress_child_warning);
        assert!(spec.child_is_self());
    }

    #[test]
    fn each_required_parameter_is_enforced() {
        for key in [PARENT_LINK, CHILD_MODEL, CHILD_LINK] {
            let mut el = joint_element("base", "crate", "lid");
            el.params.remove(key);
            assert_eq!(
                JointSpec::from_element(&el),
                Err(JointConfigError::MissingParameter(key))
            );
        }
    }

    #[test]
    fn bad_boolean_is_rejected() {
        let el = joint_element("base", "crate", "lid").with_param(SUPPRESS_CHILD_WARNING, "loud");
        assert!(matches!(
            JointSpec::from_element(&el),
            Err(JointConfigError::InvalidParameter(_))
        ));
    }

    #[test]
    fn override_topic_is_tried_first() {
        let el = joint_element("base", "crate", "lid").with_param(TOPIC, "/custom");
        let spec = JointSpec::from_element(&el).unwrap();
        assert_eq!(
            spec.topic_candidates("robot"),
            vec![
                "/custom".to_string(),
                "/model/robot/detachable_joint/detach".to_string()
            ]
        );

        let spec = JointSpec::from_element(&joint_element("base", "crate", "lid")).unwrap();
        assert_eq!(
            spec.topic_candidates("robot"),
            vec!["/model/robot/detachable_joint/detach".to_string()]
        );
    }
}
