//! # snapcheck-schema — Schema Inference & Validation
//!
//! Infers a structural [`Schema`] from a sample value and validates later
//! values against it, collecting every error found in the tree.
//!
//! ## Inference (`generate`)
//!
//! [`generate`] maps a value to a schema: objects close over their keys
//! (all required, insertion order kept), arrays take their item schema
//! from the first element, scalars map to their primitive type.
//!
//! ## Validation (`engine`, `validator`)
//!
//! [`ValidationEngine::validate`] walks value and schema together. Each node
//! is dispatched on its schema `type` to a [`Validator`]; the validator
//! asserts the runtime type, applies bounds, recurses into children and
//! finally evaluates the node's custom [`Rule`] trees. Errors carry the
//! dotted / bracketed path of the offending node, e.g.
//! `root.users[2].email: expected string, found integer`.
//!
//! ## Custom Rules (`rule`, `predicates`)
//!
//! Schemas may attach `validations: {"and": [...], "or": [...]}` whose
//! leaves name predicates registered on the engine with
//! [`ValidationEngine::register_rule`]. The built-ins (`schema-only`,
//! `regex`, `date-order`) are registered by
//! [`ValidationEngine::with_builtin_rules`].
//!
//! ## Crate Policy
//!
//! - Depends only on `snapcheck-core` internally.
//! - Non-conforming data is reported, never raised: `validate` returns
//!   `Err` only for configuration errors (unknown type, unregistered rule).

pub mod context;
pub mod engine;
pub mod generate;
pub mod pattern;
pub mod predicates;
pub mod rule;
pub mod schema;
pub mod validator;

pub use context::Context;
pub use engine::{Predicate, RuleOutcome, ValidationEngine, ValidationReport};
pub use generate::generate;
pub use pattern::Pattern;
pub use rule::{Rule, RULE_NAME_KEY};
pub use schema::{Schema, SchemaType, Validations};
pub use validator::{Validator, ValidatorRegistry};
