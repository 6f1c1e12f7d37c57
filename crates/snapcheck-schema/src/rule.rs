//! # Rule Trees
//!
//! A rule is either a named predicate with extra arguments or an AND/OR
//! combination of sub-rules. On disk a rule is a plain mapping:
//!
//! ```text
//! {"ruleName": "date-order", "date_key_names": ["start", "end"]}
//! {"and": [<rule>, <rule>]}
//! {"or":  [<rule>, {"and": [...]}]}
//! ```
//!
//! The mapping is parsed once into [`Rule`] when the schema is read. A
//! mapping of any other shape becomes [`Rule::Invalid`] rather than a load
//! failure, so the engine can report it at the node it is attached to.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key naming the registered predicate in a stored rule.
pub const RULE_NAME_KEY: &str = "ruleName";

/// A parsed rule tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A registered predicate invoked with `args` attached to its context.
    Predicate {
        /// Registered rule name.
        name: String,
        /// Every other key of the stored mapping.
        args: Map<String, Value>,
    },
    /// Passes when every sub-rule passes.
    And(Vec<Rule>),
    /// Passes when at least one sub-rule passes.
    Or(Vec<Rule>),
    /// A stored rule of unrecognised shape, kept verbatim.
    Invalid(Value),
}

impl Rule {
    /// A predicate rule with no arguments.
    pub fn predicate(name: impl Into<String>) -> Self {
        Self::Predicate {
            name: name.into(),
            args: Map::new(),
        }
    }

    /// Add an argument to a predicate rule. No-op for other variants.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Self::Predicate { args, .. } = &mut self {
            args.insert(key.into(), value.into());
        }
        self
    }

    /// Conjunction of `rules`.
    pub fn and(rules: Vec<Rule>) -> Self {
        Self::And(rules)
    }

    /// Disjunction of `rules`.
    pub fn or(rules: Vec<Rule>) -> Self {
        Self::Or(rules)
    }

    /// Parse a stored rule mapping.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::Invalid(value);
        };
        if let Some(Value::String(name)) = map.get(RULE_NAME_KEY) {
            let name = name.clone();
            map.remove(RULE_NAME_KEY);
            return Self::Predicate { name, args: map };
        }
        if let Some(Value::Array(items)) = map.get("and") {
            return Self::And(items.iter().cloned().map(Self::from_value).collect());
        }
        if let Some(Value::Array(items)) = map.get("or") {
            return Self::Or(items.iter().cloned().map(Self::from_value).collect());
        }
        Self::Invalid(Value::Object(map))
    }

    /// Render back to the stored mapping form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Predicate { name, args } => {
                let mut map = Map::with_capacity(args.len() + 1);
                map.insert(RULE_NAME_KEY.to_string(), Value::String(name.clone()));
                map.extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Object(map)
            }
            Self::And(rules) => combinator("and", rules),
            Self::Or(rules) => combinator("or", rules),
            Self::Invalid(raw) => raw.clone(),
        }
    }
}

fn combinator(op: &str, rules: &[Rule]) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(
        op.to_string(),
        Value::Array(rules.iter().map(Rule::to_value).collect()),
    );
    Value::Object(map)
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Rule::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_predicate_with_args() {
        let rule = Rule::from_value(json!({
            "ruleName": "date-order",
            "date_key_names": ["start", "end"],
            "date_format": "%Y-%m-%d"
        }));
        match rule {
            Rule::Predicate { name, args } => {
                assert_eq!(name, "date-order");
                assert_eq!(args.len(), 2);
                assert_eq!(args["date_key_names"], json!(["start", "end"]));
            }
            other => panic!("expected predicate, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_combinators() {
        let rule = Rule::from_value(json!({
            "and": [
                {"ruleName": "a"},
                {"or": [{"ruleName": "b"}, {"ruleName": "c"}]}
            ]
        }));
        assert_eq!(
            rule,
            Rule::and(vec![
                Rule::predicate("a"),
                Rule::or(vec![Rule::predicate("b"), Rule::predicate("c")]),
            ])
        );
    }

    #[test]
    fn unrecognised_shapes_are_invalid() {
        assert_eq!(Rule::from_value(json!("regex")), Rule::Invalid(json!("regex")));
        assert_eq!(
            Rule::from_value(json!({"name": "regex"})),
            Rule::Invalid(json!({"name": "regex"}))
        );
        assert_eq!(
            Rule::from_value(json!({"and": "not-a-list"})),
            Rule::Invalid(json!({"and": "not-a-list"}))
        );
    }

    #[test]
    fn to_value_restores_stored_form() {
        let stored = json!({"or": [{"ruleName": "regex", "pattern": "^a"}, {"ruleName": "schema-only"}]});
        let rule: Rule = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(serde_json::to_value(&rule).unwrap(), stored);
    }

    #[test]
    fn with_arg_ignored_on_combinators() {
        let rule = Rule::and(vec![]).with_arg("x", 1);
        assert_eq!(rule, Rule::And(vec![]));
    }
}
