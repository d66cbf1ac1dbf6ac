//! Validation results
//!
//! A [`ValidationResult`] is the sole artifact a schema or contract
//! evaluation produces: a field-keyed map of error messages, nested where
//! the schema nests. An empty map means the payload passed. Results are
//! allocated fresh per evaluation and never mutated after return.

use serde::Serialize;
use std::collections::BTreeMap;

/// Errors recorded against a single field
///
/// Scalar and array fields carry a flat message list; nested-schema
/// fields carry the child schema's own field-keyed map, mirroring the
/// shape of the schema that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    /// Ordered error messages for a scalar or array field
    Messages(Vec<String>),
    /// Field-keyed errors for a nested-schema field
    Nested(BTreeMap<String, ErrorEntry>),
}

impl ErrorEntry {
    /// Check whether this entry carries no messages at any level
    pub fn is_empty(&self) -> bool {
        match self {
            ErrorEntry::Messages(msgs) => msgs.is_empty(),
            ErrorEntry::Nested(map) => map.values().all(|e| e.is_empty()),
        }
    }

    /// The flat message list, if this is a scalar/array entry
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            ErrorEntry::Messages(msgs) => Some(msgs),
            ErrorEntry::Nested(_) => None,
        }
    }

    /// The nested error map, if this is a nested-schema entry
    pub fn nested(&self) -> Option<&BTreeMap<String, ErrorEntry>> {
        match self {
            ErrorEntry::Messages(_) => None,
            ErrorEntry::Nested(map) => Some(map),
        }
    }
}

/// Result of evaluating a schema or contract against a payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<String, ErrorEntry>,
}

impl ValidationResult {
    /// Create an empty (valid) result
    pub fn valid() -> Self {
        Self::default()
    }

    /// Whether the payload passed: no errors at any level
    pub fn is_valid(&self) -> bool {
        self.errors.values().all(|e| e.is_empty())
    }

    /// Append a message under a field key, preserving append order
    pub fn add_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let entry = self
            .errors
            .entry(key.into())
            .or_insert_with(|| ErrorEntry::Messages(Vec::new()));
        if let ErrorEntry::Messages(msgs) = entry {
            msgs.push(message.into());
        }
    }

    /// Record a nested result under a field key; empty results are
    /// dropped so a clean nested field leaves no entry behind
    pub fn add_nested(&mut self, key: impl Into<String>, nested: ValidationResult) {
        if !nested.is_valid() {
            self.errors
                .insert(key.into(), ErrorEntry::Nested(nested.errors));
        }
    }

    /// The field-keyed error map
    pub fn errors(&self) -> &BTreeMap<String, ErrorEntry> {
        &self.errors
    }

    /// Errors recorded for a single field, if any
    pub fn get(&self, key: &str) -> Option<&ErrorEntry> {
        self.errors.get(key)
    }

    /// Flat messages for a field; empty slice if the field is clean or
    /// carries nested errors instead
    pub fn messages(&self, key: &str) -> &[String] {
        self.errors
            .get(key)
            .and_then(|e| e.messages())
            .unwrap_or(&[])
    }
}
