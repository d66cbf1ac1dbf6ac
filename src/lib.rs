//! Payload Validation
//!
//! A declarative validation engine for JSON-shaped payloads, in two
//! layers:
//!
//! 1. **Schema** (`schema`): named fields, each required or optional,
//!    constrained to a primitive type, a nested schema, or an array.
//!    Evaluating a schema against a payload produces a field-keyed
//!    [`ValidationResult`]; an empty result means the payload is
//!    structurally valid.
//!
//! 2. **Contract** (`contract`): a schema plus ordered semantic rules
//!    that run only after structural validation succeeds, using an
//!    injected collaborator (e.g. a record-existence lookup) and
//!    reporting into the same field-keyed error map.
//!
//! ## Features
//!
//! - **Composition by reference**: schemas embed other schemas through
//!   `Arc`, so a base schema is reusable unmodified across parents.
//! - **Verbatim messages**: `"is missing"`, `"must be a string"`,
//!   `"must be an integer"`, and friends are part of the contract with
//!   callers; results serialize (serde) to the exact
//!   `field -> [message]` JSON shape downstream code renders.
//! - **Dependency injection**: collaborators are constructor parameters,
//!   never process-wide singletons.
//! - **Concurrency-safe**: schemas and contracts are immutable after
//!   construction; every evaluation allocates its own result.
//!
//! ## Example
//!
//! ```rust
//! use payload_validation::{Constraint, Contract, LookupRule, RecordLookup, Schema};
//! use std::sync::Arc;
//!
//! struct CityDirectory;
//!
//! impl RecordLookup for CityDirectory {
//!     fn is_valid(&self, id: i64) -> payload_validation::Result<bool> {
//!         Ok(id <= 100)
//!     }
//! }
//!
//! let schema = Arc::new(
//!     Schema::builder()
//!         .required("name", Constraint::string())
//!         .required("city_id", Constraint::integer())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let contract = Contract::new(schema, Arc::new(CityDirectory))
//!     .with_rule(LookupRule::new("city_id", "invalid city"));
//!
//! let payload = serde_json::json!({ "name": "baltic", "city_id": 300 });
//! let result = contract.evaluate(&payload).unwrap();
//! assert_eq!(result.messages("city_id"), ["invalid city"]);
//! ```

pub mod contract;
pub mod error;
pub mod result;
pub mod schema;

pub use contract::{BoxedRule, Contract, FnRule, LookupRule, RecordLookup, Rule};
pub use error::{Result, ValidationError};
pub use result::{ErrorEntry, ValidationResult};
pub use schema::{Constraint, FieldRule, FieldType, Schema, SchemaBuilder};
