// SPDX-License-Identifier: Apache-2.0 OR MIT
// Log entry and its ordered attribute mapping

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Attribute key that carries the producing machine's name
pub const MACHINE_KEY: &str = "machine";

/// Attribute key that tags queued entries with their origin
pub const TYPE_KEY: &str = "type";

/// Ordered string-to-string mapping attached to a log line
///
/// Keys are unique; inserting an existing key replaces its value in place,
/// so the original insertion position is kept. Order is significant because
/// the pairs become XML attributes in exactly this order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty mapping
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Shorthand for a mapping holding only a machine name
    pub fn machine(name: &str) -> Self {
        let mut attrs = Self::new();
        attrs.insert(MACHINE_KEY, name);
        attrs
    }

    /// Insert or replace a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The machine identifier, if present
    pub fn machine_name(&self) -> Option<&str> {
        self.get(MACHINE_KEY)
    }

    /// Iterate pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut attrs = Attributes::new();
        while let Some((k, v)) = access.next_entry::<String, String>()? {
            attrs.insert(k, v);
        }
        Ok(attrs)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// Where an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Issued by the foreground thread and written immediately
    Sync,
    /// Serial console output from a background producer, queued
    Serial,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryKind::Sync => "sync",
            EntryKind::Serial => "serial",
        }
    }
}

/// A single log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub attributes: Attributes,
    pub kind: EntryKind,
}

impl LogEntry {
    /// Create a foreground entry
    pub fn new(message: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            message: message.into(),
            attributes,
            kind: EntryKind::Sync,
        }
    }

    /// Create a serial console entry, tagged with `machine` and `type="serial"`
    pub fn serial(message: impl Into<String>, machine: &str) -> Self {
        let attributes = Attributes::machine(machine).with(TYPE_KEY, EntryKind::Serial.as_str());
        Self {
            message: message.into(),
            attributes,
            kind: EntryKind::Serial,
        }
    }

    /// Split into the message and the attributes forwarded to the writer
    pub fn into_parts(self) -> (String, Attributes) {
        (self.message, self.attributes)
    }
}
