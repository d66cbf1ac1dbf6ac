//! Schema definition and structural evaluation
//!
//! A [`Schema`] is an ordered set of named fields, each marked required
//! or optional and constrained to a primitive type, a nested schema, or
//! an array. Schemas are built once, are immutable afterwards, and are
//! embedded in one another by `Arc` reference, so a single schema can be
//! reused as a building block inside several parents and evaluated
//! concurrently without locking.
//!
//! Evaluation walks the declared fields in order against a
//! `serde_json::Value` payload and accumulates field-keyed errors into a
//! [`ValidationResult`]. Presence is checked before shape: an absent
//! required field reports only `"is missing"`, never a type error on top.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{Result, ValidationError};
use crate::result::ValidationResult;

/// Primitive value types a field can be constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// JSON string
    String,
    /// JSON integer (floats and booleans do not qualify)
    Integer,
}

impl FieldType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }

    /// Check if a JSON value matches this type
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
        }
    }

    /// The error message reported on a type mismatch
    fn mismatch_message(&self) -> &'static str {
        match self {
            FieldType::String => "must be a string",
            FieldType::Integer => "must be an integer",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value constraint for a single field
#[derive(Debug, Clone)]
pub enum Constraint {
    /// A primitive value of the given type
    Primitive(FieldType),
    /// A nested object validated by the referenced schema
    Nested(Arc<Schema>),
    /// An array whose elements are all of the given primitive type
    ArrayOf(FieldType),
    /// An array whose elements are each validated by the referenced
    /// schema; `min_size` is the minimum element count (0 = no minimum)
    ArrayOfSchema {
        schema: Arc<Schema>,
        min_size: usize,
    },
}

impl Constraint {
    /// Constrain to a string value
    pub fn string() -> Self {
        Constraint::Primitive(FieldType::String)
    }

    /// Constrain to an integer value
    pub fn integer() -> Self {
        Constraint::Primitive(FieldType::Integer)
    }

    /// Constrain to an object validated by a nested schema
    pub fn nested(schema: Arc<Schema>) -> Self {
        Constraint::Nested(schema)
    }

    /// Constrain to an array of primitive values
    pub fn array_of(field_type: FieldType) -> Self {
        Constraint::ArrayOf(field_type)
    }

    /// Constrain to an array of schema-validated objects
    pub fn array_of_schema(schema: Arc<Schema>, min_size: usize) -> Self {
        Constraint::ArrayOfSchema { schema, min_size }
    }
}

/// Presence requirement and value constraint for one field
#[derive(Debug, Clone)]
pub struct FieldRule {
    required: bool,
    constraint: Constraint,
}

impl FieldRule {
    /// Create a required field rule
    pub fn required(constraint: Constraint) -> Self {
        Self {
            required: true,
            constraint,
        }
    }

    /// Create an optional field rule
    pub fn optional(constraint: Constraint) -> Self {
        Self {
            required: false,
            constraint,
        }
    }

    /// Whether the field must be present
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The field's value constraint
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

/// An ordered, immutable set of field rules
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    /// Start building a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Iterate fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Look up a field rule by name
    pub fn get_field(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rule)| rule)
    }

    /// Evaluate this schema against a payload
    ///
    /// Returns a field-keyed error map; an empty map means the payload
    /// is structurally valid. A payload that is not an object at all is
    /// reported as every required field missing.
    pub fn evaluate(&self, payload: &serde_json::Value) -> ValidationResult {
        debug!(fields = self.fields.len(), "evaluating schema");
        let mut result = ValidationResult::valid();

        let Some(object) = payload.as_object() else {
            for (name, rule) in &self.fields {
                if rule.is_required() {
                    result.add_message(name.clone(), "is missing");
                }
            }
            return result;
        };

        for (name, rule) in &self.fields {
            let Some(value) = object.get(name.as_str()) else {
                if rule.is_required() {
                    trace!(field = %name, "required field absent");
                    result.add_message(name.clone(), "is missing");
                }
                continue;
            };
            if is_blank(value, rule.constraint()) {
                if rule.is_required() {
                    trace!(field = %name, "required field blank");
                    result.add_message(name.clone(), "is missing");
                }
                continue;
            }
            check_constraint(name, rule.constraint(), value, &mut result);
        }

        result
    }
}

/// A blank value counts as absent: explicit null always, and the empty
/// string for string-typed fields (the payloads treat "" as not filled)
fn is_blank(value: &serde_json::Value, constraint: &Constraint) -> bool {
    if value.is_null() {
        return true;
    }
    matches!(constraint, Constraint::Primitive(FieldType::String))
        && value.as_str() == Some("")
}

fn check_constraint(
    name: &str,
    constraint: &Constraint,
    value: &serde_json::Value,
    result: &mut ValidationResult,
) {
    match constraint {
        Constraint::Primitive(field_type) => {
            if !field_type.matches(value) {
                result.add_message(name, field_type.mismatch_message());
            }
        }
        Constraint::Nested(schema) => {
            if value.is_object() {
                result.add_nested(name, schema.evaluate(value));
            } else {
                result.add_message(name, "must be a hash");
            }
        }
        Constraint::ArrayOf(field_type) => match value.as_array() {
            Some(items) => {
                // Element failures are coarse: one field-level message,
                // no per-index paths
                if items.iter().any(|item| !field_type.matches(item)) {
                    result.add_message(name, "is invalid");
                }
            }
            None => result.add_message(name, "must be an array"),
        },
        Constraint::ArrayOfSchema { schema, min_size } => match value.as_array() {
            Some(items) => {
                if items.len() < *min_size {
                    result.add_message(name, format!("size cannot be less than {}", min_size));
                }
                if items.iter().any(|item| !schema.evaluate(item).is_valid()) {
                    result.add_message(name, "is invalid");
                }
            }
            None => result.add_message(name, "must be an array"),
        },
    }
}

/// Builder for [`Schema`]
///
/// Fields keep their declaration order; declaring the same field twice
/// is a construction error.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldRule)>,
}

impl SchemaBuilder {
    /// Add a field with an explicit rule
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    /// Add a required field
    pub fn required(self, name: impl Into<String>, constraint: Constraint) -> Self {
        self.field(name, FieldRule::required(constraint))
    }

    /// Add an optional field
    pub fn optional(self, name: impl Into<String>, constraint: Constraint) -> Self {
        self.field(name, FieldRule::optional(constraint))
    }

    /// Finalize the schema, checking field-name uniqueness
    pub fn build(self) -> Result<Schema> {
        for (i, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|(other, _)| other == name) {
                return Err(ValidationError::schema(format!(
                    "duplicate field '{}'",
                    name
                )));
            }
        }
        Ok(Schema {
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair_schema() -> Schema {
        Schema::builder()
            .required("name", Constraint::string())
            .required("count", Constraint::integer())
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_payload_passes() {
        let schema = pair_schema();
        let result = schema.evaluate(&json!({ "name": "x", "count": 3 }));
        assert!(result.is_valid());
    }

    #[test]
    fn test_missing_required_field() {
        let schema = pair_schema();
        let result = schema.evaluate(&json!({ "name": "x" }));
        assert_eq!(result.messages("count"), ["is missing"]);
        assert!(result.get("name").is_none());
    }

    #[test]
    fn test_presence_checked_before_shape() {
        // An absent field never reports a type error on top of "is missing"
        let schema = pair_schema();
        let result = schema.evaluate(&json!({ "name": "x" }));
        assert_eq!(result.messages("count").len(), 1);
    }

    #[test]
    fn test_type_mismatch_messages() {
        let schema = pair_schema();
        let result = schema.evaluate(&json!({ "name": 7, "count": "three" }));
        assert_eq!(result.messages("name"), ["must be a string"]);
        assert_eq!(result.messages("count"), ["must be an integer"]);
    }

    #[test]
    fn test_float_and_bool_are_not_integers() {
        let schema = pair_schema();
        let result = schema.evaluate(&json!({ "name": "x", "count": 3.5 }));
        assert_eq!(result.messages("count"), ["must be an integer"]);

        let result = schema.evaluate(&json!({ "name": "x", "count": true }));
        assert_eq!(result.messages("count"), ["must be an integer"]);
    }

    #[test]
    fn test_null_and_empty_string_count_as_missing() {
        let schema = pair_schema();
        let result = schema.evaluate(&json!({ "name": "", "count": null }));
        assert_eq!(result.messages("name"), ["is missing"]);
        assert_eq!(result.messages("count"), ["is missing"]);
    }

    #[test]
    fn test_optional_absent_field_is_skipped() {
        let schema = Schema::builder()
            .optional("description", Constraint::string())
            .build()
            .unwrap();
        let result = schema.evaluate(&json!({}));
        assert!(result.is_valid());
    }

    #[test]
    fn test_optional_present_field_is_still_type_checked() {
        let schema = Schema::builder()
            .optional("description", Constraint::string())
            .build()
            .unwrap();
        let result = schema.evaluate(&json!({ "description": 42 }));
        assert_eq!(result.messages("description"), ["must be a string"]);
    }

    #[test]
    fn test_non_object_payload_reports_all_required_missing() {
        let schema = pair_schema();
        for payload in [json!("nope"), json!(12), json!([1, 2]), json!(null)] {
            let result = schema.evaluate(&payload);
            assert_eq!(result.messages("name"), ["is missing"]);
            assert_eq!(result.messages("count"), ["is missing"]);
        }
    }

    #[test]
    fn test_nested_schema_merges_under_parent_key() {
        let child = Arc::new(pair_schema());
        let parent = Schema::builder()
            .required("entity", Constraint::nested(child))
            .build()
            .unwrap();

        let result = parent.evaluate(&json!({ "entity": { "name": "x" } }));
        let nested = result.get("entity").unwrap().nested().unwrap();
        assert_eq!(nested["count"].messages().unwrap(), ["is missing"]);

        let result = parent.evaluate(&json!({ "entity": { "name": "x", "count": 1 } }));
        assert!(result.is_valid());
        assert!(result.get("entity").is_none());
    }

    #[test]
    fn test_nested_field_must_be_an_object() {
        let child = Arc::new(pair_schema());
        let parent = Schema::builder()
            .required("entity", Constraint::nested(child))
            .build()
            .unwrap();
        let result = parent.evaluate(&json!({ "entity": "not a hash" }));
        assert_eq!(result.messages("entity"), ["must be a hash"]);
    }

    #[test]
    fn test_empty_nested_schema_accepts_empty_object() {
        let child = Arc::new(Schema::builder().build().unwrap());
        let parent = Schema::builder()
            .required("entity", Constraint::nested(child))
            .build()
            .unwrap();
        assert!(parent.evaluate(&json!({ "entity": {} })).is_valid());
    }

    #[test]
    fn test_array_of_primitive() {
        let schema = Schema::builder()
            .required("ids", Constraint::array_of(FieldType::Integer))
            .build()
            .unwrap();

        assert!(schema.evaluate(&json!({ "ids": [1, 2, 3] })).is_valid());
        assert!(schema.evaluate(&json!({ "ids": [] })).is_valid());

        let result = schema.evaluate(&json!({ "ids": [1, "two"] }));
        assert_eq!(result.messages("ids"), ["is invalid"]);

        let result = schema.evaluate(&json!({ "ids": "1,2,3" }));
        assert_eq!(result.messages("ids"), ["must be an array"]);
    }

    #[test]
    fn test_array_of_schema_min_size() {
        let item = Arc::new(pair_schema());
        let schema = Schema::builder()
            .required("items", Constraint::array_of_schema(item, 1))
            .build()
            .unwrap();

        let result = schema.evaluate(&json!({ "items": [] }));
        assert_eq!(result.messages("items"), ["size cannot be less than 1"]);

        let result = schema.evaluate(&json!({ "items": [{ "name": "x", "count": 1 }] }));
        assert!(result.is_valid());
    }

    #[test]
    fn test_array_of_schema_element_failure_is_field_level() {
        let item = Arc::new(pair_schema());
        let schema = Schema::builder()
            .required("items", Constraint::array_of_schema(item, 0))
            .build()
            .unwrap();

        let result = schema.evaluate(&json!({
            "items": [{ "name": "x", "count": 1 }, { "name": "y" }]
        }));
        assert_eq!(result.messages("items"), ["is invalid"]);
    }

    #[test]
    fn test_shared_schema_is_reusable_across_parents() {
        let base = Arc::new(pair_schema());
        let as_required = Schema::builder()
            .required("entity", Constraint::nested(Arc::clone(&base)))
            .build()
            .unwrap();
        let as_optional = Schema::builder()
            .optional("entity", Constraint::nested(Arc::clone(&base)))
            .build()
            .unwrap();

        // Optionality belongs to the embedding field, not the schema:
        // once present, the referenced schema is fully enforced
        assert!(as_optional.evaluate(&json!({})).is_valid());
        let result = as_optional.evaluate(&json!({ "entity": { "name": "x" } }));
        assert!(!result.is_valid());

        let result = as_required.evaluate(&json!({}));
        assert_eq!(result.messages("entity"), ["is missing"]);
    }

    #[test]
    fn test_duplicate_field_is_a_construction_error() {
        let err = Schema::builder()
            .required("name", Constraint::string())
            .optional("name", Constraint::string())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate field 'name'"));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let schema = pair_schema();
        let payload = json!({ "name": 7 });
        assert_eq!(schema.evaluate(&payload), schema.evaluate(&payload));
    }
}
