//! Declarative configuration element handed to systems at configure time.
//!
//! An [`Element`] is a named node carrying string parameters and nested
//! child elements. Values are parsed on read with [`Element::get`], so the
//! same element can come from any serde format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Errors produced when reading typed values out of an element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    #[error("parameter '{key}' of <{element}> could not be parsed from '{value}'")]
    InvalidValue {
        element: String,
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style parameter insert.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Raw string value of `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parse `key` as `T`. `Ok(None)` when the parameter is absent.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>, ElementError> {
        let Some(raw) = self.params.get(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ElementError::InvalidValue {
                element: self.name.clone(),
                key: key.to_string(),
                value: raw.clone(),
            })
    }

    /// Parse `key` as `T`, falling back to `default` when absent.
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ElementError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Child elements named `name`, in declaration order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}
