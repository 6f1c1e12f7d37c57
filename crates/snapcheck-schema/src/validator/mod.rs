//! # Structural Validators
//!
//! One validator per schema primitive type. The set is closed: validators
//! are an enum dispatched by `match`, and the registry only decides which
//! variant handles which type name.
//!
//! Every validator follows the same sequence:
//!
//! 1. Check the runtime type of `ctx.data`. On mismatch, reprove once and
//!    stop; bounds and rules are meaningless for a value of the wrong type.
//! 2. Apply the type's structural checks (properties, items, bounds).
//! 3. Evaluate `schema.validations` through the engine.
//!
//! Validators never fail for a non-conforming value; they reprove. An
//! `Err` is reserved for configuration errors surfaced by the engine.

mod array;
mod object;
mod scalar;

use std::collections::HashMap;

use snapcheck_core::{value_kind, SnapError};

use crate::context::Context;
use crate::engine::ValidationEngine;
use crate::schema::SchemaType;

/// A structural validator for one schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Closed-world mapping validation.
    Object,
    /// Per-element validation against `items`.
    Array,
    /// Length and pattern checks.
    String,
    /// Integral bounds and `multipleOf`.
    Integer,
    /// Floating bounds and `multipleOf`.
    Number,
    /// Type assertion only.
    Boolean,
    /// Type assertion only.
    Null,
}

impl Validator {
    /// The default validator for a schema type.
    pub fn for_type(kind: SchemaType) -> Self {
        match kind {
            SchemaType::Object => Self::Object,
            SchemaType::Array => Self::Array,
            SchemaType::String => Self::String,
            SchemaType::Integer => Self::Integer,
            SchemaType::Number => Self::Number,
            SchemaType::Boolean => Self::Boolean,
            SchemaType::Null => Self::Null,
        }
    }

    /// The schema type whose runtime shape this validator accepts.
    pub fn accepts(&self) -> SchemaType {
        match self {
            Self::Object => SchemaType::Object,
            Self::Array => SchemaType::Array,
            Self::String => SchemaType::String,
            Self::Integer => SchemaType::Integer,
            Self::Number => SchemaType::Number,
            Self::Boolean => SchemaType::Boolean,
            Self::Null => SchemaType::Null,
        }
    }

    /// Validate `ctx.data` against `ctx.schema`, recursing through `engine`.
    pub fn validate(&self, ctx: &mut Context<'_>, engine: &ValidationEngine) -> Result<(), SnapError> {
        let expected = self.accepts();
        let found = value_kind(ctx.data);
        if found != expected.as_str() {
            ctx.reprove(format!("expected {expected}, found {found}"));
            return Ok(());
        }

        match self {
            Self::Object => object::validate(ctx, engine)?,
            Self::Array => array::validate(ctx, engine)?,
            Self::String => scalar::validate_string(ctx),
            Self::Integer | Self::Number => scalar::validate_numeric(ctx),
            Self::Boolean | Self::Null => {}
        }

        engine.apply_validations(ctx)
    }
}

/// Maps schema types to the validator that handles them.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<SchemaType, Validator>,
}

impl ValidatorRegistry {
    /// A registry with no validators.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Register (or replace) the validator for `kind`.
    pub fn register(&mut self, kind: SchemaType, validator: Validator) {
        self.validators.insert(kind, validator);
    }

    /// The validator for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Configuration` if no validator is registered.
    pub fn get(&self, kind: SchemaType) -> Result<Validator, SnapError> {
        self.validators.get(&kind).copied().ok_or_else(|| {
            SnapError::Configuration(format!("no validator registered for type '{kind}'"))
        })
    }

    /// The validator for a type given by name.
    ///
    /// # Errors
    ///
    /// Returns `SnapError::Configuration` for an unknown type name or an
    /// unregistered type.
    pub fn get_validator(&self, type_name: &str) -> Result<Validator, SnapError> {
        self.get(type_name.parse()?)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in SchemaType::ALL {
            registry.register(kind, Validator::for_type(kind));
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_every_type() {
        let registry = ValidatorRegistry::default();
        for kind in SchemaType::ALL {
            assert_eq!(registry.get(kind).unwrap().accepts(), kind);
        }
    }

    #[test]
    fn unknown_type_name_is_configuration_error() {
        let err = ValidatorRegistry::default().get_validator("tuple").unwrap_err();
        assert!(matches!(err, SnapError::Configuration(_)));
    }

    #[test]
    fn unregistered_type_is_configuration_error() {
        let err = ValidatorRegistry::empty().get_validator("string").unwrap_err();
        assert!(err.to_string().contains("no validator registered for type 'string'"));
    }
}
