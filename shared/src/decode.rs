//! Validated decoding of remote payloads
//!
//! Every row or function result coming back from the backend is decoded into an
//! explicit record type at this boundary. Missing fields, mistyped fields and
//! values that violate a record's own rules fail with [`DecodeError`] instead of
//! leaking half-parsed data into the rest of the app.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{entity}: missing required field `{field}`")]
    MissingField { entity: &'static str, field: String },

    #[error("{entity}: type mismatch: {reason}")]
    TypeMismatch { entity: &'static str, reason: String },

    #[error("{entity}: invalid value for `{field}`: {reason}")]
    InvalidValue {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("{entity}: malformed payload: {source}")]
    Malformed {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    pub fn invalid_value(
        entity: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        DecodeError::InvalidValue {
            entity,
            field,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::DecodeFailed
    }

    pub fn entity(&self) -> &'static str {
        match self {
            DecodeError::MissingField { entity, .. }
            | DecodeError::TypeMismatch { entity, .. }
            | DecodeError::InvalidValue { entity, .. }
            | DecodeError::Malformed { entity, .. } => entity,
        }
    }

    /// Classify a serde_json error raised while decoding `entity`
    fn from_serde(entity: &'static str, err: serde_json::Error) -> Self {
        let msg = err.to_string();
        if let Some(rest) = msg.strip_prefix("missing field `")
            && let Some(end) = rest.find('`')
        {
            return DecodeError::MissingField {
                entity,
                field: rest[..end].to_string(),
            };
        }
        if msg.starts_with("invalid type") {
            return DecodeError::TypeMismatch {
                entity,
                reason: msg,
            };
        }
        DecodeError::Malformed { entity, source: err }
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        let entity = err.entity();
        let app = AppError::decode(entity, err.to_string());
        match &err {
            DecodeError::MissingField { field, .. } => app.with_detail("field", field.as_str()),
            DecodeError::InvalidValue { field, .. } => app.with_detail("field", *field),
            _ => app,
        }
    }
}

/// A record type returned by a remote call
pub trait RemoteRecord: DeserializeOwned {
    /// Entity name used in error messages (usually the table name)
    const ENTITY: &'static str;

    /// Record-level rules checked after structural decoding
    fn validate(&self) -> Result<(), DecodeError> {
        Ok(())
    }
}

/// Decode a single record
pub fn decode<T: RemoteRecord>(value: Value) -> Result<T, DecodeError> {
    let record: T =
        serde_json::from_value(value).map_err(|e| DecodeError::from_serde(T::ENTITY, e))?;
    record.validate()?;
    Ok(record)
}

/// Decode a JSON array of records
pub fn decode_list<T: RemoteRecord>(value: Value) -> Result<Vec<T>, DecodeError> {
    let Value::Array(items) = value else {
        return Err(DecodeError::TypeMismatch {
            entity: T::ENTITY,
            reason: format!("expected an array of rows, got {}", json_kind(&value)),
        });
    };
    items.into_iter().map(decode).collect()
}

/// Decode the first row of a filtered select, `None` when no row matched
///
/// PostgREST always answers a filtered select with an array, even for lookups
/// by primary key.
pub fn decode_optional_first<T: RemoteRecord>(value: Value) -> Result<Option<T>, DecodeError> {
    Ok(decode_list(value)?.into_iter().next())
}

fn json_kind(value: &Value) -> &'static str {
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
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        id: String,
        count: i64,
    }

    impl RemoteRecord for Sample {
        const ENTITY: &'static str = "samples";

        fn validate(&self) -> Result<(), DecodeError> {
            if self.count < 0 {
                return Err(DecodeError::invalid_value(Self::ENTITY, "count", "must be >= 0"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_decode_ok() {
        let sample: Sample = decode(json!({"id": "a", "count": 2})).unwrap();
        assert_eq!(sample.id, "a");
        assert_eq!(sample.count, 2);
    }

    #[test]
    fn test_missing_field() {
        let err = decode::<Sample>(json!({"count": 2})).unwrap_err();
        match err {
            DecodeError::MissingField { entity, field } => {
                assert_eq!(entity, "samples");
                assert_eq!(field, "id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let err = decode::<Sample>(json!({"id": 7, "count": 2})).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { entity: "samples", .. }));
    }

    #[test]
    fn test_validation_failure() {
        let err = decode::<Sample>(json!({"id": "a", "count": -1})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidValue {
                field: "count",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_list_rejects_non_array() {
        let err = decode_list::<Sample>(json!({"id": "a", "count": 1})).unwrap_err();
        assert!(err.to_string().contains("got object"));
    }

    #[test]
    fn test_decode_optional_first() {
        let none = decode_optional_first::<Sample>(json!([])).unwrap();
        assert!(none.is_none());

        let first =
            decode_optional_first::<Sample>(json!([{"id": "x", "count": 0}, {"id": "y", "count": 1}]))
                .unwrap()
                .unwrap();
        assert_eq!(first.id, "x");
    }

    #[test]
    fn test_one_bad_row_fails_the_list() {
        let err = decode_list::<Sample>(json!([{"id": "x", "count": 0}, {"count": 1}])).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { .. }));
    }

    #[test]
    fn test_into_app_error() {
        let err = decode::<Sample>(json!({"count": 2})).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DecodeFailed);
        let details = app.details.unwrap();
        assert_eq!(details.get("entity").unwrap(), "samples");
        assert_eq!(details.get("field").unwrap(), "id");
    }
}
