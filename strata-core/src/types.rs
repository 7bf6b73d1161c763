//! Domain types for layout composition.
//!
//! Layout and slot names are newtypes; slot content is always a rendered
//! `String`. Every type here is serializable so it can be handed to a
//! template engine context as-is.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A validated, non-empty layout identifier.
///
/// A name containing `/` is *qualified*: it names a template path directly and
/// bypasses the layouts namespace. Anything else is looked up inside the
/// namespace (`"application"` → `"layouts/application"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutName(pub String);

impl LayoutName {
    /// Validate and wrap a layout name. Surrounding whitespace is trimmed.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyLayoutName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// `true` when the name carries a path separator.
    pub fn is_qualified(&self) -> bool {
        self.0.contains('/')
    }

    /// Template name to look up for this layout under `namespace`.
    pub fn qualified(&self, namespace: &str) -> String {
        if self.is_qualified() {
            return self.0.trim_start_matches('/').to_owned();
        }
        let namespace = namespace.trim_matches('/');
        if namespace.is_empty() {
            self.0.clone()
        } else {
            format!("{}/{}", namespace, self.0)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A strongly-typed name for a content slot (`content_for :menu`, `yield :menu`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotName(pub String);

impl SlotName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SlotName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SlotName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for SlotName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// SlotMap
// ---------------------------------------------------------------------------

/// Named content slots collected for one composer call.
///
/// Ordered by slot name so iteration (and anything rendered from it) is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotMap(BTreeMap<SlotName, String>);

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content under `name`, concatenating onto anything already there.
    pub fn append(&mut self, name: impl Into<SlotName>, content: &str) {
        self.0.entry(name.into()).or_default().push_str(content);
    }

    /// Register content under `name`, discarding anything already there.
    pub fn replace(&mut self, name: impl Into<SlotName>, content: impl Into<String>) {
        self.0.insert(name.into(), content.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Content under `name`, or `""` when nothing was registered.
    pub fn lookup(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotName, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &SlotName> {
        self.0.keys()
    }

    /// Append every entry of `other` into `self`.
    pub fn merge(&mut self, other: &SlotMap) {
        for (name, content) in other.iter() {
            self.append(name.clone(), content);
        }
    }
}

impl<N: Into<SlotName>, C: Into<String>> FromIterator<(N, C)> for SlotMap {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        let mut map = SlotMap::new();
        for (name, content) in iter {
            map.append(name, &content.into());
        }
        map
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
