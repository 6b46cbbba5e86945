//! Structural checks run on a parsed payload before it is typed.

use serde_json::Value;

use crate::codec::error::CodecError;
use crate::envelope::model::Envelope;

/// Checks that `doc` has a `blueprint` object holding an `entities` array.
///
/// Nothing else is required: `icons`, `item` and `version` may be absent.
pub(crate) fn validate(doc: &Value) -> Result<(), CodecError> {
    let root = doc.as_object().ok_or_else(|| {
        CodecError::SchemaMismatch(format!(
            "document is {}, expected an object",
            type_name(doc)
        ))
    })?;

    let blueprint = match root.get("blueprint") {
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(CodecError::SchemaMismatch(format!(
                "`blueprint` is {}, expected an object",
                type_name(other)
            )))
        }
        None => {
            return Err(CodecError::SchemaMismatch(
                "missing `blueprint` object".to_string(),
            ))
        }
    };

    match blueprint.get("entities") {
        Some(Value::Array(_)) => Ok(()),
        Some(other) => Err(CodecError::SchemaMismatch(format!(
            "`blueprint.entities` is {}, expected an array",
            type_name(other)
        ))),
        None => Err(CodecError::SchemaMismatch(
            "missing `blueprint.entities` array".to_string(),
        )),
    }
}

/// Validates `doc` and converts it into a typed [`Envelope`].
pub(crate) fn into_envelope(doc: Value) -> Result<Envelope, CodecError> {
    validate(&doc)?;
    serde_json::from_value(doc).map_err(|e| CodecError::SchemaMismatch(e.to_string()))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mismatch_message(doc: Value) -> String {
        match validate(&doc) {
            Err(CodecError::SchemaMismatch(msg)) => msg,
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_document_is_valid() {
        assert!(validate(&json!({ "blueprint": { "entities": [] } })).is_ok());
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert!(mismatch_message(json!([1, 2, 3])).contains("an array"));
    }

    #[test]
    fn test_missing_blueprint_is_rejected() {
        assert!(mismatch_message(json!({ "blueprint_book": {} })).contains("missing `blueprint`"));
    }

    #[test]
    fn test_blueprint_of_wrong_type_is_rejected() {
        assert!(mismatch_message(json!({ "blueprint": "x" })).contains("a string"));
    }

    #[test]
    fn test_missing_entities_is_rejected() {
        let msg = mismatch_message(json!({ "blueprint": { "icons": [] } }));
        assert!(msg.contains("missing `blueprint.entities`"));
    }

    #[test]
    fn test_entities_of_wrong_type_is_rejected() {
        let msg = mismatch_message(json!({ "blueprint": { "entities": {} } }));
        assert!(msg.contains("an object"));
    }

    #[test]
    fn test_into_envelope_tolerates_ill_typed_icons_and_version() {
        let doc = json!({ "blueprint": { "entities": [], "icons": "nope", "version": -4 } });
        let env = into_envelope(doc).unwrap();
        assert!(env.blueprint.icons.is_empty());
        assert_eq!(env.blueprint.version, None);
    }

    #[test]
    fn test_into_envelope_keeps_entities_in_order() {
        let doc = json!({ "blueprint": { "entities": [{ "n": 3 }, { "n": 1 }, { "n": 2 }] } });
        let env = into_envelope(doc).unwrap();
        assert_eq!(
            env.into_entities(),
            vec![json!({ "n": 3 }), json!({ "n": 1 }), json!({ "n": 2 })]
        );
    }
}
