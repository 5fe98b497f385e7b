//! # Field Rules
//!
//! A [`RuleSet`] is a table of field rules evaluated against a JSON input.
//! Each rule names a field (dotted paths reach into nested objects), whether
//! it must be present, the checks its value must pass and the message
//! reported when any check fails.
//!
//! Evaluation never mutates the input and reports at most one violation per
//! field, in table order.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Where a validated value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
    Query,
}

/// A single predicate on a present, non-null value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// JSON string
    String,
    /// String that is not empty after trimming
    NotBlank,
    /// String whose trimmed length is at least `n` characters
    MinLength(usize),
    /// JSON integer (strings are rejected)
    Integer,
    /// JSON number (strings are rejected)
    Number,
    /// Number strictly greater than zero
    Positive,
    /// String shaped like an e-mail address
    Email,
    /// String shaped like a record id
    Id,
    /// JSON object
    Object,
    /// String holding an integer of at least 1 (query parameters)
    PositiveIntegerText,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
    })
}

/// Whether `value` has the shape of a store id
pub fn is_valid_id(value: &str) -> bool {
    Uuid::try_parse(value).is_ok()
}

impl Check {
    /// Evaluate this check against a value
    pub fn passes(&self, value: &Value) -> bool {
        match self {
            Check::String => value.is_string(),
            Check::NotBlank => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Check::MinLength(min) => value
                .as_str()
                .is_some_and(|s| s.trim().chars().count() >= *min),
            Check::Integer => value.as_i64().is_some(),
            Check::Number => value.is_number(),
            Check::Positive => value.as_f64().is_some_and(|n| n > 0.0),
            Check::Email => value.as_str().is_some_and(|s| email_pattern().is_match(s.trim())),
            Check::Id => value.as_str().is_some_and(is_valid_id),
            Check::Object => value.is_object(),
            Check::PositiveIntegerText => value
                .as_str()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .is_some_and(|n| n >= 1),
        }
    }
}

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing or `null` is a violation
    Required,
    /// Checked only when present and not `null`
    Optional,
}

/// Rule for one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub presence: Presence,
    pub checks: &'static [Check],
    pub message: &'static str,
    /// Never echo the value back in a violation
    pub redacted: bool,
}

impl FieldRule {
    pub const fn required(
        field: &'static str,
        checks: &'static [Check],
        message: &'static str,
    ) -> Self {
        Self {
            field,
            presence: Presence::Required,
            checks,
            message,
            redacted: false,
        }
    }

    pub const fn optional(
        field: &'static str,
        checks: &'static [Check],
        message: &'static str,
    ) -> Self {
        Self {
            field,
            presence: Presence::Optional,
            checks,
            message,
            redacted: false,
        }
    }

    /// Same rule, with the offending value left out of violations
    pub const fn secret(self) -> Self {
        Self {
            redacted: true,
            ..self
        }
    }
}

/// A failed field rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub location: Location,
    pub field: String,
    pub message: String,
    /// Offending value; absent when the field was missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Rules for every field read from one request location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSet {
    pub location: Location,
    pub fields: &'static [FieldRule],
}

impl RuleSet {
    pub const fn new(location: Location, fields: &'static [FieldRule]) -> Self {
        Self { location, fields }
    }

    /// Evaluate every rule, returning violations in table order
    pub fn evaluate(&self, input: &Value) -> Vec<Violation> {
        self.fields
            .iter()
            .filter_map(|rule| {
                let value = lookup(input, rule.field).filter(|v| !v.is_null());
                let satisfied = match value {
                    Some(value) => rule.checks.iter().all(|check| check.passes(value)),
                    None => rule.presence == Presence::Optional,
                };
                (!satisfied).then(|| Violation {
                    location: self.location,
                    field: rule.field.to_string(),
                    message: rule.message.to_string(),
                    value: value.filter(|_| !rule.redacted).cloned(),
                })
            })
            .collect()
    }
}

/// Resolve a dotted field path
fn lookup<'a>(input: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(input, |value, key| value.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: RuleSet = RuleSet::new(
        Location::Body,
        &[
            FieldRule::required("name", &[Check::String, Check::MinLength(2)], "bad name"),
            FieldRule::optional("price", &[Check::Number, Check::Positive], "bad price"),
            FieldRule::optional("meta.tag", &[Check::NotBlank], "bad tag"),
        ],
    );

    #[test]
    fn test_valid_input_has_no_violations() {
        let input = json!({"name": "Lamp", "price": 3.5, "meta": {"tag": "x"}});
        assert!(SAMPLE.evaluate(&input).is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let violations = SAMPLE.evaluate(&json!({}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "bad name");
        assert_eq!(violations[0].location, Location::Body);
        assert!(violations[0].value.is_none());
    }

    #[test]
    fn test_violation_carries_offending_value() {
        let violations = SAMPLE.evaluate(&json!({"name": 7}));
        assert_eq!(violations[0].value, Some(json!(7)));
    }

    #[test]
    fn test_secret_rule_hides_value() {
        const PASSWORD: RuleSet = RuleSet::new(
            Location::Body,
            &[FieldRule::required("password", &[Check::MinLength(8)], "too short").secret()],
        );
        let violations = PASSWORD.evaluate(&json!({"password": "hunter2"}));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].value.is_none());
    }

    #[test]
    fn test_optional_null_is_skipped() {
        let input = json!({"name": "Lamp", "price": null});
        assert!(SAMPLE.evaluate(&input).is_empty());
    }

    #[test]
    fn test_violations_follow_table_order() {
        let input = json!({"name": " a ", "price": -1, "meta": {"tag": "  "}});
        let fields: Vec<_> = SAMPLE
            .evaluate(&input)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["name", "price", "meta.tag"]);
    }

    #[test]
    fn test_min_length_uses_trimmed_value() {
        assert!(!Check::MinLength(2).passes(&json!(" a ")));
        assert!(Check::MinLength(2).passes(&json!(" ab ")));
    }

    #[test]
    fn test_integer_rejects_strings_and_fractions() {
        assert!(Check::Integer.passes(&json!(2020)));
        assert!(!Check::Integer.passes(&json!("2020")));
        assert!(!Check::Integer.passes(&json!(20.5)));
    }

    #[test]
    fn test_number_and_positive() {
        assert!(Check::Number.passes(&json!(0)));
        assert!(!Check::Number.passes(&json!("3")));
        assert!(!Check::Positive.passes(&json!(0)));
        assert!(Check::Positive.passes(&json!(0.01)));
    }

    #[test]
    fn test_email() {
        assert!(Check::Email.passes(&json!("ada@example.com")));
        assert!(!Check::Email.passes(&json!("ada@example")));
        assert!(!Check::Email.passes(&json!("ada example.com")));
        assert!(!Check::Email.passes(&json!(42)));
    }

    #[test]
    fn test_id() {
        assert!(Check::Id.passes(&json!(Uuid::new_v4().to_string())));
        assert!(!Check::Id.passes(&json!("507f1f77bcf86cd79943901")));
        assert!(!Check::Id.passes(&json!(7)));
    }

    #[test]
    fn test_positive_integer_text() {
        assert!(Check::PositiveIntegerText.passes(&json!("3")));
        assert!(!Check::PositiveIntegerText.passes(&json!("0")));
        assert!(!Check::PositiveIntegerText.passes(&json!("-1")));
        assert!(!Check::PositiveIntegerText.passes(&json!("two")));
    }
}
