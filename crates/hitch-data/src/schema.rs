//! Serde structs for scene files.
//!
//! A scene is a list of models. Each model names its links and the plugins
//! to configure on it. Plugin parameters may be written as strings, numbers
//! or booleans; they are normalized to strings when converted into an
//! [`Element`], which parses them on read.

use hitch_core::element::Element;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A whole scene file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneData {
    #[serde(default)]
    pub models: Vec<ModelData>,
}

/// One model with its links and plugins.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelData {
    pub name: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub plugins: Vec<PluginData>,
}

/// A `<plugin>` attached to a model.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginData {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

/// A scalar parameter value in any of the forms the formats produce.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl ModelData {
    /// The model as a `model` element with a `name` parameter and one
    /// `plugin` child per declared plugin.
    pub fn to_element(&self) -> Element {
        self.plugins.iter().fold(
            Element::new("model").with_param("name", &self.name),
            |el, plugin| el.with_child(plugin.to_element()),
        )
    }
}

impl PluginData {
    /// The plugin as a configuration element named `plugin`, with a `name`
    /// parameter holding the plugin's name.
    pub fn to_element(&self) -> Element {
        self.params.iter().fold(
            Element::new("plugin").with_param("name", &self.name),
            |el, (key, value)| el.with_param(key.as_str(), value),
        )
    }
}
