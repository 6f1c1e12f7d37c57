//! # Validation Engine
//!
//! Orchestrates recursive structural validation and evaluates rule trees.
//!
//! ## Dispatch
//!
//! [`ValidationEngine::validate`] builds a root [`Context`] at path `root`
//! and dispatches on the schema's `type` to the registered [`Validator`].
//! There is no coercion between types at this layer: an integer checked
//! against a `number` schema is a type mismatch, and so is the reverse.
//! A schema without a `type` accepts any value and only runs its rules.
//!
//! ## Rule Evaluation
//!
//! Each rule evaluates to a [`RuleOutcome`] without touching the node's
//! context, so an `or` can discard the reprovals of the branches it did not
//! need:
//!
//! - predicate: invoked on a side context carrying the rule's arguments;
//!   fails iff it reproved;
//! - `and`: passes iff all sub-rules pass, carrying every sub-error;
//! - `or`: passes iff any sub-rule passes, carrying sub-errors only on failure;
//! - an unrecognised rule fails with an "invalid validation rule" error at
//!   the node.
//!
//! A predicate name with no registration is a configuration error and
//! aborts the whole validation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use snapcheck_core::{SnapError, ValidationError, ValidationErrors};

use crate::context::Context;
use crate::predicates;
use crate::rule::Rule;
use crate::schema::{Schema, SchemaType};
use crate::validator::{Validator, ValidatorRegistry};

/// A registered predicate. It signals failure by calling `ctx.reprove`.
pub type Predicate = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// Result of evaluating one rule tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Whether the rule passed.
    pub passed: bool,
    /// Reprovals to attribute to the node if the outcome is kept.
    pub errors: Vec<ValidationError>,
}

impl RuleOutcome {
    fn pass() -> Self {
        Self {
            passed: true,
            errors: Vec::new(),
        }
    }
}

/// Outcome of validating a value against a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: ValidationErrors,
}

impl ValidationReport {
    /// Returns true if no errors were reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors, in discovery order.
    pub fn errors(&self) -> &[ValidationError] {
        self.errors.errors()
    }

    /// Convert into `Err(SnapError::Validation)` when invalid.
    pub fn into_result(self) -> Result<(), SnapError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SnapError::Validation(self.errors))
        }
    }

    /// Consumes self and returns the error collection.
    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// Structural validator dispatch plus the predicate registry.
///
/// Construct one per process or test run and pass it by reference.
#[derive(Clone, Default)]
pub struct ValidationEngine {
    validators: ValidatorRegistry,
    rules: HashMap<String, Predicate>,
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        rules.sort_unstable();
        f.debug_struct("ValidationEngine")
            .field("validators", &self.validators)
            .field("rules", &rules)
            .finish()
    }
}

impl ValidationEngine {
    /// An engine with the default validators and no predicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with the default validators and the built-in predicates
    /// (`schema-only`, `regex`, `date-order`).
    pub fn with_builtin_rules() -> Self {
        let mut engine = Self::new();
        predicates::register_builtin_rules(&mut engine);
        engine
    }

    /// Register (or replace) the structural validator for `kind`.
    pub fn register_validator(&mut self, kind: SchemaType, validator: Validator) {
        self.validators.register(kind, validator);
    }

    /// The structural validator registered for `type_name`.
    pub fn get_validator(&self, type_name: &str) -> Result<Validator, SnapError> {
        self.validators.get_validator(type_name)
    }

    /// Register (or replace) a named predicate.
    pub fn register_rule<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(predicate));
    }

    /// Whether a predicate is registered under `name`.
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Validate `data` against `schema`, collecting every error in the tree.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Configuration` if the schema names a type with no
    /// registered validator or a rule with no registered predicate.
    pub fn validate(&self, data: &Value, schema: &Schema) -> Result<ValidationReport, SnapError> {
        let mut ctx = Context::new(data, schema, "root");
        self.validate_node(&mut ctx)?;
        tracing::trace!(errors = ctx.errors.len(), "validation pass complete");
        Ok(ValidationReport {
            errors: ValidationErrors::new(ctx.errors),
        })
    }

    /// Validate one node, recursing through its validator.
    pub(crate) fn validate_node(&self, ctx: &mut Context<'_>) -> Result<(), SnapError> {
        match ctx.schema.kind {
            Some(kind) => self.validators.get(kind)?.validate(ctx, self),
            None => self.apply_validations(ctx),
        }
    }

    /// Evaluate the node's `validations` and merge failures into `ctx`.
    pub(crate) fn apply_validations(&self, ctx: &mut Context<'_>) -> Result<(), SnapError> {
        let schema = ctx.schema;
        let Some(validations) = &schema.validations else {
            return Ok(());
        };
        if let Some(key) = validations.unknown.keys().next() {
            return Err(SnapError::Configuration(format!(
                "unknown validations key '{key}' at {} (expected 'and' or 'or')",
                ctx.path
            )));
        }

        if !validations.and.is_empty() {
            let outcome = self.evaluate_all(ctx, &validations.and)?;
            if !outcome.passed {
                ctx.errors.extend(outcome.errors);
                ctx.reprove("'and' validations failed");
            }
        }
        if !validations.or.is_empty() {
            let outcome = self.evaluate_any(ctx, &validations.or)?;
            if !outcome.passed {
                ctx.errors.extend(outcome.errors);
                ctx.reprove("'or' validations failed");
            }
        }
        Ok(())
    }

    /// Evaluate a single rule tree against the node in `ctx`.
    pub fn apply_rule(&self, ctx: &Context<'_>, rule: &Rule) -> Result<RuleOutcome, SnapError> {
        match rule {
            Rule::Predicate { name, args } => {
                let predicate = self.rules.get(name).ok_or_else(|| {
                    SnapError::Configuration(format!("validation rule '{name}' is not registered"))
                })?;
                let mut side = ctx.with_args(args.clone());
                predicate(&mut side);
                Ok(RuleOutcome {
                    passed: side.errors.is_empty(),
                    errors: side.errors,
                })
            }
            Rule::And(rules) => self.evaluate_all(ctx, rules),
            Rule::Or(rules) => self.evaluate_any(ctx, rules),
            Rule::Invalid(raw) => Ok(RuleOutcome {
                passed: false,
                errors: vec![ValidationError::new(
                    ctx.path.clone(),
                    format!("invalid validation rule: {raw}"),
                )],
            }),
        }
    }

    fn evaluate_all(&self, ctx: &Context<'_>, rules: &[Rule]) -> Result<RuleOutcome, SnapError> {
        let mut outcome = RuleOutcome::pass();
        for rule in rules {
            let sub = self.apply_rule(ctx, rule)?;
            outcome.passed &= sub.passed;
            outcome.errors.extend(sub.errors);
        }
        Ok(outcome)
    }

    fn evaluate_any(&self, ctx: &Context<'_>, rules: &[Rule]) -> Result<RuleOutcome, SnapError> {
        let mut errors = Vec::new();
        for rule in rules {
            let sub = self.apply_rule(ctx, rule)?;
            if sub.passed {
                return Ok(RuleOutcome::pass());
            }
            errors.extend(sub.errors);
        }
        Ok(RuleOutcome {
            passed: false,
            errors,
        })
    }
}
