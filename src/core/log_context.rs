//! Level-scoped structured context
//!
//! This module provides:
//! - `ContextStore`: per-node fields bucketed by the level they were attached at
//! - `Fields`: a typed, ordered field set for infallible attachment

use super::error::Result;
use super::field_value::{collect_fields, FieldMap, FieldValue};
use super::log_level::LogLevel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fields attached to a log node, keyed by severity.
///
/// A field attached at level `L` is visible whenever the node is rendered at
/// `L` or any higher level. Buckets are independent: the same key may exist
/// at several levels, in which case the highest visible bucket wins on read.
///
/// # Example
///
/// ```
/// use rust_ctxlog::{ContextStore, LogLevel};
/// use std::collections::HashMap;
///
/// let mut store = ContextStore::new();
/// store.attach(LogLevel::Info, &HashMap::from([("user_id", "42")])).unwrap();
/// store.attach(LogLevel::Error, &HashMap::from([("query", "SELECT 1")])).unwrap();
///
/// assert!(store.visible_at(LogLevel::Info).contains_key("user_id"));
/// assert!(!store.visible_at(LogLevel::Info).contains_key("query"));
/// assert!(store.visible_at(LogLevel::Critical).contains_key("query"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextStore {
    buckets: BTreeMap<LogLevel, FieldMap>,
}

impl ContextStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Attach every field of `fields` at `level`.
    ///
    /// `fields` must serialize as a map or struct whose values stay within the
    /// [`FieldValue`] shapes. Validation happens before any mutation, so a
    /// rejected call leaves the store exactly as it was.
    pub fn attach<T: Serialize + ?Sized>(&mut self, level: LogLevel, fields: &T) -> Result<()> {
        let validated = collect_fields(fields)?;
        if validated.is_empty() {
            return Ok(());
        }
        self.buckets.entry(level).or_default().extend(validated);
        Ok(())
    }

    /// Attach a single typed field at `level`.
    ///
    /// Non-finite floats are stored as strings, as with `From<f64>` for
    /// [`FieldValue`].
    pub fn insert<K, V>(&mut self, level: LogLevel, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.buckets
            .entry(level)
            .or_default()
            .insert(key.into(), value.into().into_finite());
    }

    /// Union of every bucket at or below `level`
    pub fn visible_at(&self, level: LogLevel) -> FieldMap {
        let mut merged = FieldMap::new();
        for bucket in self.buckets.range(..=level).map(|(_, bucket)| bucket) {
            merged.extend(bucket.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Fields attached at exactly `level`
    pub fn bucket(&self, level: LogLevel) -> Option<&FieldMap> {
        self.buckets.get(&level)
    }

    /// Levels that currently hold at least one field
    pub fn levels(&self) -> impl Iterator<Item = LogLevel> + '_ {
        self.buckets.keys().copied()
    }

    /// Check if the store has any fields
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of distinct keys across all buckets
    pub fn len(&self) -> usize {
        self.visible_at(LogLevel::Critical).len()
    }
}

/// Typed set of fields with heterogeneous values.
///
/// Serializes as a plain map, so it can be handed to any `ctx` call.
///
/// ```
/// use rust_ctxlog::Fields;
///
/// let fields = Fields::new()
///     .with("user_id", 123)
///     .with("username", "john_doe")
///     .with("active", true);
/// assert_eq!(fields.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields {
    fields: FieldMap,
}

impl Fields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self {
            fields: FieldMap::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a field by name
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
