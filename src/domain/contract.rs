//! Response contract - typed access to untrusted provider text.
//!
//! The reasoning provider returns prose that is expected, but not guaranteed,
//! to contain a JSON payload. Every structured stage funnels its response
//! through this module: extract the JSON span, parse it, check the stage's
//! required fields, fill stage defaults. Callers always receive either a
//! fully-defaulted object or a classified failure, never a partially
//! initialized value.

use serde_json::{Map, Value};
use thiserror::Error;

/// Contract violations when consuming a provider response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("no JSON object found in response")]
    NoJsonFound,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),
}

/// Stateless parser/validator for provider responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseContract;

impl ResponseContract {
    /// Locates the JSON object span in free text: the first `{` through the
    /// last `}`, greedily, tolerating surrounding prose.
    pub fn extract(text: &str) -> Result<&str, ContractError> {
        let start = text.find('{').ok_or(ContractError::NoJsonFound)?;
        let end = text.rfind('}').ok_or(ContractError::NoJsonFound)?;
        if end < start {
            return Err(ContractError::NoJsonFound);
        }
        Ok(&text[start..=end])
    }

    /// Decodes an extracted span into a JSON object.
    pub fn parse(raw: &str) -> Result<Map<String, Value>, ContractError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ContractError::MalformedJson(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ContractError::MalformedJson(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Checks that every required field is present and non-null.
    pub fn validate(
        object: &Map<String, Value>,
        required: &[&str],
    ) -> Result<(), ContractError> {
        for field in required {
            match object.get(*field) {
                Some(value) if !value.is_null() => {}
                _ => return Err(ContractError::MissingRequiredField(field.to_string())),
            }
        }
        Ok(())
    }

    /// Fills in absent fields from `defaults`. Present fields (including
    /// explicit nulls that passed validation as optional) are left untouched,
    /// which makes the operation idempotent.
    pub fn apply_defaults(
        mut object: Map<String, Value>,
        defaults: &[(&str, Value)],
    ) -> Map<String, Value> {
        for (field, default) in defaults {
            object
                .entry(field.to_string())
                .or_insert_with(|| default.clone());
        }
        object
    }

    /// Full contract pass: extract, parse, validate, default.
    pub fn read(
        text: &str,
        required: &[&str],
        defaults: &[(&str, Value)],
    ) -> Result<Map<String, Value>, ContractError> {
        let raw = Self::extract(text)?;
        let object = Self::parse(raw)?;
        Self::validate(&object, required)?;
        Ok(Self::apply_defaults(object, defaults))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_finds_object_inside_prose() {
        let text = "Here is my analysis: {\"total\": 175} Hope that helps!";
        assert_eq!(ResponseContract::extract(text).unwrap(), "{\"total\": 175}");
    }

    #[test]
    fn extract_is_greedy_across_nested_objects() {
        let text = "{\"a\": {\"b\": 1}} trailing";
        assert_eq!(
            ResponseContract::extract(text).unwrap(),
            "{\"a\": {\"b\": 1}}"
        );
    }

    #[test]
    fn extract_fails_without_braces() {
        assert_eq!(
            ResponseContract::extract("no json here"),
            Err(ContractError::NoJsonFound)
        );
        assert_eq!(
            ResponseContract::extract("} backwards {"),
            Err(ContractError::NoJsonFound)
        );
    }

    #[test]
    fn parse_rejects_non_objects() {
        let err = ResponseContract::parse("[1, 2]").unwrap_err();
        assert!(matches!(err, ContractError::MalformedJson(_)));

        let err = ResponseContract::parse("{not json").unwrap_err();
        assert!(matches!(err, ContractError::MalformedJson(_)));
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let object = ResponseContract::parse(r#"{"trades": []}"#).unwrap();
        let err = ResponseContract::validate(&object, &["trades", "urgency"]).unwrap_err();
        assert_eq!(err, ContractError::MissingRequiredField("urgency".to_string()));
    }

    #[test]
    fn validate_treats_null_as_missing() {
        let object = ResponseContract::parse(r#"{"total": null}"#).unwrap();
        let err = ResponseContract::validate(&object, &["total"]).unwrap_err();
        assert_eq!(err, ContractError::MissingRequiredField("total".to_string()));
    }

    #[test]
    fn apply_defaults_fills_only_absent_fields() {
        let object = ResponseContract::parse(r#"{"confidence": 0.9}"#).unwrap();
        let defaulted = ResponseContract::apply_defaults(
            object,
            &[("confidence", json!(0.8)), ("reasoning", json!("generated"))],
        );

        assert_eq!(defaulted["confidence"], json!(0.9));
        assert_eq!(defaulted["reasoning"], json!("generated"));
    }

    #[test]
    fn apply_defaults_is_idempotent() {
        let object = ResponseContract::parse(r#"{"a": 1}"#).unwrap();
        let defaults = [("b", json!([])), ("c", json!("x"))];

        let once = ResponseContract::apply_defaults(object, &defaults);
        let twice = ResponseContract::apply_defaults(once.clone(), &defaults);
        assert_eq!(once, twice);
    }

    #[test]
    fn read_composes_the_full_pass() {
        let text = "Sure! {\"total\": 175.4, \"breakdown\": {}} Let me know.";
        let object = ResponseContract::read(
            text,
            &["total", "breakdown"],
            &[("confidence", json!(0.8))],
        )
        .unwrap();

        assert_eq!(object["total"], json!(175.4));
        assert_eq!(object["confidence"], json!(0.8));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn json_leaf() -> impl Strategy<Value = Value> {
            prop_oneof![
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                // Brace-free strings so the surrounding-prose invariant holds.
                "[a-zA-Z0-9 .,!?-]{0,20}".prop_map(Value::from),
            ]
        }

        fn json_object() -> impl Strategy<Value = Map<String, Value>> {
            proptest::collection::btree_map("[a-z]{1,8}", json_leaf(), 0..6).prop_map(|m| {
                m.into_iter().collect()
            })
        }

        proptest! {
            // Any well-formed object embedded in brace-free prose survives
            // extract-then-parse unchanged.
            #[test]
            fn extract_then_parse_round_trips(
                object in json_object(),
                prefix in "[^{}]{0,40}",
                suffix in "[^{}]{0,40}",
            ) {
                let embedded = format!("{}{}{}", prefix, Value::Object(object.clone()), suffix);
                let raw = ResponseContract::extract(&embedded).unwrap();
                let parsed = ResponseContract::parse(raw).unwrap();
                prop_assert_eq!(parsed, object);
            }

            #[test]
            fn defaults_idempotent_for_any_object(object in json_object()) {
                let defaults = [("confidence", serde_json::json!(0.8))];
                let once = ResponseContract::apply_defaults(object, &defaults);
                let twice = ResponseContract::apply_defaults(once.clone(), &defaults);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
