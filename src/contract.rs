//! Contracts: schema validation plus semantic rules
//!
//! A [`Contract`] pairs a [`Schema`] with an ordered list of [`Rule`]s
//! and an injected collaborator. Evaluation is two strictly sequential
//! phases: structural validation first, and only if it passes, every
//! rule in declaration order. Rules therefore always see a structurally
//! valid, fully typed payload and are never handed malformed input.
//!
//! Collaborators are bound at construction, never looked up globally. A
//! collaborator fault aborts evaluation with an error rather than being
//! disguised as a field failure.

use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::result::ValidationResult;
use crate::schema::Schema;

/// Lookup capability injected into a contract
///
/// The engine never decides how ids are verified; implementations
/// typically consult a data store or a remote service. The call is
/// fallible so an outage can surface as a hard error instead of a
/// misleading field message.
pub trait RecordLookup: Send + Sync {
    /// Check whether an id references an existing, valid record
    fn is_valid(&self, id: i64) -> Result<bool>;
}

/// A single semantic check over a structurally valid payload
///
/// Each rule reports against one field key (a schema field or a
/// synthetic key) and yields at most one message per evaluation.
pub trait Rule: Send + Sync {
    /// Field key this rule reports against
    fn key(&self) -> &str;

    /// Run the check; `Some(message)` records a failure under the key
    fn check(
        &self,
        payload: &serde_json::Value,
        lookup: &dyn RecordLookup,
    ) -> Result<Option<String>>;
}

/// A boxed rule for dynamic dispatch
pub type BoxedRule = Box<dyn Rule>;

/// Closure-backed rule, for checks that do not warrant a named type
pub struct FnRule<F> {
    key: String,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&serde_json::Value, &dyn RecordLookup) -> Result<Option<String>> + Send + Sync,
{
    /// Create a rule from a field key and a check function
    pub fn new(key: impl Into<String>, check: F) -> Self {
        Self {
            key: key.into(),
            check,
        }
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&serde_json::Value, &dyn RecordLookup) -> Result<Option<String>> + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn check(
        &self,
        payload: &serde_json::Value,
        lookup: &dyn RecordLookup,
    ) -> Result<Option<String>> {
        (self.check)(payload, lookup)
    }
}

/// Rule that verifies an integer id field against the collaborator
///
/// Reads `payload[key]` as an integer and reports `message` when the
/// lookup rejects it. The common case for association checks, e.g.
/// `LookupRule::new("city_id", "invalid city")`.
pub struct LookupRule {
    key: String,
    message: String,
}

impl LookupRule {
    /// Create a lookup rule for an id field
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl Rule for LookupRule {
    fn key(&self) -> &str {
        &self.key
    }

    fn check(
        &self,
        payload: &serde_json::Value,
        lookup: &dyn RecordLookup,
    ) -> Result<Option<String>> {
        // Structural validation has already typed this field; anything
        // else (absent optional, non-integer) is not this rule's concern
        let Some(id) = payload.get(&self.key).and_then(|v| v.as_i64()) else {
            return Ok(None);
        };
        if lookup.is_valid(id)? {
            Ok(None)
        } else {
            Ok(Some(self.message.clone()))
        }
    }
}

/// A schema plus ordered semantic rules and a bound collaborator
pub struct Contract {
    schema: Arc<Schema>,
    rules: Vec<BoxedRule>,
    lookup: Arc<dyn RecordLookup>,
}

impl Contract {
    /// Create a contract with its collaborator bound
    pub fn new(schema: Arc<Schema>, lookup: Arc<dyn RecordLookup>) -> Self {
        Self {
            schema,
            rules: Vec::new(),
            lookup,
        }
    }

    /// Register a rule; rules run in registration order
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Register a boxed rule
    pub fn with_boxed_rule(mut self, rule: BoxedRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The contract's schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Evaluate the contract against a payload
    ///
    /// Structural failure short-circuits: the structural errors are
    /// returned as-is and no rule executes. On structural success every
    /// rule runs, independently, appending messages per key in
    /// registration order. Only a collaborator fault returns `Err`.
    pub fn evaluate(&self, payload: &serde_json::Value) -> Result<ValidationResult> {
        let structural = self.schema.evaluate(payload);
        if !structural.is_valid() {
            debug!("structural validation failed, skipping rules");
            return Ok(structural);
        }

        debug!(rules = self.rules.len(), "running contract rules");
        let mut result = ValidationResult::valid();
        for rule in &self.rules {
            if let Some(message) = rule.check(payload, self.lookup.as_ref())? {
                result.add_message(rule.key(), message);
            }
        }
        Ok(result)
    }
}
