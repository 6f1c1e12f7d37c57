//! # Schema Model
//!
//! The recursive structural descriptor stored alongside every snapshot.
//! Field names follow JSON Schema spelling (`minLength`, `multipleOf`, ...)
//! so stored records stay readable and hand-editable; `validations` is the
//! one snapcheck-specific field and holds caller-attached rule trees.
//!
//! A schema without a `type` is unconstrained. The generator produces one
//! for the `items` of an empty array.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use snapcheck_core::SnapError;

use crate::pattern::Pattern;
use crate::rule::Rule;

/// The closed set of schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Mapping from string keys to values.
    Object,
    /// Ordered sequence of values.
    Array,
    /// UTF-8 string.
    String,
    /// Integral number.
    Integer,
    /// Floating-point number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// The null value.
    Null,
}

impl SchemaType {
    /// Every schema type, in declaration order.
    pub const ALL: [SchemaType; 7] = [
        Self::Object,
        Self::Array,
        Self::String,
        Self::Integer,
        Self::Number,
        Self::Boolean,
        Self::Null,
    ];

    /// Returns the type name as stored in a schema's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = SnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SnapError::Configuration(format!("unsupported schema type '{s}'")))
    }
}

/// Caller-attached rule lists, keyed by logical operator.
///
/// Keys other than `and` / `or` are kept in `unknown` so that a stored
/// record still loads; the engine rejects them as a configuration error
/// when the node is validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validations {
    /// Every rule must pass.
    pub and: Vec<Rule>,
    /// At least one rule must pass.
    pub or: Vec<Rule>,
    /// Unrecognised operator keys, e.g. a misspelt `adn`.
    pub unknown: Map<String, Value>,
}

impl Validations {
    /// Returns true if nothing is attached, recognised or not.
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.unknown.is_empty()
    }

    /// Append `other`'s rules and unknown keys to `self`.
    pub fn extend(&mut self, other: &Validations) {
        self.and.extend(other.and.iter().cloned());
        self.or.extend(other.or.iter().cloned());
        self.unknown
            .extend(other.unknown.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl Serialize for Validations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = usize::from(!self.and.is_empty())
            + usize::from(!self.or.is_empty())
            + self.unknown.len();
        let mut map = serializer.serialize_map(Some(len))?;
        if !self.and.is_empty() {
            map.serialize_entry("and", &self.and)?;
        }
        if !self.or.is_empty() {
            map.serialize_entry("or", &self.or)?;
        }
        for (key, value) in &self.unknown {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Validations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut rules = |key: &str| -> Result<Vec<Rule>, D::Error> {
            match raw.remove(key) {
                None => Ok(Vec::new()),
                Some(list) => serde_json::from_value(list)
                    .map_err(|e| D::Error::custom(format!("validations '{key}': {e}"))),
            }
        };
        let and = rules("and")?;
        let or = rules("or")?;
        Ok(Self { and, or, unknown: raw })
    }
}

/// A structural schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Expected runtime type; `None` accepts any value.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,

    /// Object: schema per key, in insertion order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Object: keys that must be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Array: schema applied to every element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// String: minimum length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// String: maximum length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// String: regex that must match at the start of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,

    /// Integer / number: inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    /// Integer / number: inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    /// Integer / number: value must be a multiple of this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    /// Custom rule trees evaluated after the structural checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<Validations>,
}

impl Schema {
    /// A schema with only its `type` set.
    pub fn of(kind: SchemaType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// The unconstrained schema `{}`.
    pub fn any() -> Self {
        Self::default()
    }

    /// Attach an `and` rule.
    pub fn with_and(mut self, rule: Rule) -> Self {
        self.validations.get_or_insert_with(Validations::default).and.push(rule);
        self
    }

    /// Attach an `or` rule.
    pub fn with_or(mut self, rule: Rule) -> Self {
        self.validations.get_or_insert_with(Validations::default).or.push(rule);
        self
    }

    /// Look up the subschema for an object property.
    pub fn property(&self, key: &str) -> Option<&Schema> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    /// Mutable lookup for an object property, e.g. to attach validations.
    pub fn property_mut(&mut self, key: &str) -> Option<&mut Schema> {
        self.properties.as_mut().and_then(|p| p.get_mut(key))
    }

    /// Whether `key` is listed in `required`.
    pub fn is_required(&self, key: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|r| r.iter().any(|k| k == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names_round_trip() {
        for t in SchemaType::ALL {
            assert_eq!(t.as_str().parse::<SchemaType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_type_is_configuration_error() {
        let err = "date".parse::<SchemaType>().unwrap_err();
        assert!(matches!(err, SnapError::Configuration(_)));
    }

    #[test]
    fn serializes_with_json_schema_names() {
        let schema = Schema {
            min_length: Some(2),
            pattern: Some("[a-z]+".into()),
            ..Schema::of(SchemaType::String)
        };
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"type": "string", "minLength": 2, "pattern": "[a-z]+"})
        );
    }

    #[test]
    fn empty_schema_is_empty_object() {
        assert_eq!(serde_json::to_value(Schema::any()).unwrap(), json!({}));
        let parsed: Schema = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed, Schema::any());
    }

    #[test]
    fn deserializes_bounds_and_validations() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "number",
            "minimum": 0,
            "maximum": 9.5,
            "multipleOf": 0.5,
            "validations": {"and": [{"ruleName": "schema-only"}]}
        }))
        .unwrap();
        assert_eq!(schema.kind, Some(SchemaType::Number));
        assert_eq!(schema.minimum, Some(Number::from(0)));
        assert_eq!(schema.validations.unwrap().and.len(), 1);
    }

    #[test]
    fn validations_keep_unknown_keys() {
        let stored = json!({"and": [{"ruleName": "schema-only"}], "adn": [{"ruleName": "regex"}]});
        let validations: Validations = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(validations.and.len(), 1);
        assert!(validations.or.is_empty());
        assert_eq!(validations.unknown.keys().collect::<Vec<_>>(), ["adn"]);
        assert_eq!(serde_json::to_value(&validations).unwrap(), stored);
    }

    #[test]
    fn empty_validations_serialize_as_empty_map() {
        assert_eq!(serde_json::to_value(Validations::default()).unwrap(), json!({}));
        let parsed: Validations = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn is_required_checks_list() {
        let schema = Schema {
            required: Some(vec!["a".into()]),
            ..Schema::of(SchemaType::Object)
        };
        assert!(schema.is_required("a"));
        assert!(!schema.is_required("b"));
    }
}
