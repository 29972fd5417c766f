//! Request payload validation.
//!
//! Bounds live on the request types as `validator` attributes. Before those run,
//! a pass over the raw JSON keeps only the fields the type declares and reports
//! any that are not strings. The result is every violation found, in field
//! declaration order, never just the first one. Validation does no I/O.

pub mod schemas;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

const REQUIRED: &str = "required";
const EMPTY: &str = "empty";
const LENGTH: &str = "length";

/// FieldSpec
///
/// One accepted field: its JSON key, the Rust field name `validator` reports it
/// under, and the human-readable label used in messages ("Post ID").
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub json: &'static str,
    pub field: &'static str,
    pub label: &'static str,
}

impl FieldSpec {
    pub const fn new(json: &'static str, field: &'static str, label: &'static str) -> Self {
        Self { json, field, label }
    }
}

/// ValidatedPayload
///
/// A request type whose raw JSON is checked against `FIELDS` and whose
/// `Validate` impl carries the bounds.
pub trait ValidatedPayload: DeserializeOwned + Validate {
    const FIELDS: &'static [FieldSpec];
}

// --- Custom rules referenced from the model attributes ---

/// A required string. Absent fields deserialize as "" and land here too.
pub fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(REQUIRED));
    }
    Ok(())
}

/// An optional string that, once sent, may not be blank.
pub fn non_empty_text(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(EMPTY));
    }
    Ok(())
}

/// Struct-level rule for partial updates.
pub fn at_least_one_field(provided: &[bool]) -> Result<(), ValidationError> {
    if provided.iter().any(|present| *present) {
        return Ok(());
    }
    Err(ValidationError::new("at_least_one_field")
        .with_message("At least one field must be provided for update".into()))
}

/// validate_payload
///
/// Runs the JSON pre-pass and then `T::validate`. On success returns the typed
/// payload with unknown fields dropped; on failure one message per violation.
pub fn validate_payload<T: ValidatedPayload>(raw: &Value) -> Result<T, Vec<String>> {
    let Value::Object(object) = raw else {
        return Err(vec!["Request body must be a JSON object".to_string()]);
    };

    let mut normalized = Map::new();
    let mut mistyped = Vec::new();
    for spec in T::FIELDS {
        match object.get(spec.json) {
            None => {}
            Some(Value::String(text)) => {
                normalized.insert(spec.json.to_string(), Value::String(text.clone()));
            }
            Some(_) => mistyped.push(spec.json),
        }
    }

    let payload: T =
        serde_json::from_value(Value::Object(normalized)).map_err(|e| vec![e.to_string()])?;

    let errors = match payload.validate() {
        Ok(()) if mistyped.is_empty() => return Ok(payload),
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    Err(flatten::<T>(object, &mistyped, &errors))
}

fn flatten<T: ValidatedPayload>(
    object: &Map<String, Value>,
    mistyped: &[&str],
    errors: &ValidationErrors,
) -> Vec<String> {
    let by_field = errors.field_errors();
    let mut messages = Vec::new();

    for spec in T::FIELDS {
        if mistyped.contains(&spec.json) {
            messages.push(format!("{} must be a string", spec.label));
            continue;
        }
        // Keyed by the Rust field name unless serde renamed it.
        let found = by_field
            .get(spec.field)
            .or_else(|| by_field.get(spec.json));
        if let Some(found) = found {
            let sent = object.get(spec.json).and_then(Value::as_str);
            if let Some(message) = describe(spec, found, sent) {
                messages.push(message);
            }
        }
    }

    // A mistyped field was still sent, so it counts towards "at least one".
    if mistyped.is_empty() {
        if let Some(struct_level) = by_field.get("__all__") {
            messages.extend(
                struct_level
                    .iter()
                    .filter_map(|error| error.message.as_ref().map(|m| m.to_string())),
            );
        }
    }

    messages
}

fn describe(spec: &FieldSpec, errors: &[ValidationError], value: Option<&str>) -> Option<String> {
    let has = |code: &str| errors.iter().any(|error| error.code == code);

    if has(REQUIRED) {
        return Some(format!("{} is required", spec.label));
    }
    if has(EMPTY) {
        return Some(format!("{} is not allowed to be empty", spec.label));
    }

    let length = errors.iter().find(|error| error.code == LENGTH)?;
    let bound = |name: &str| length.params.get(name).and_then(Value::as_u64);
    let len = value.map_or(0, |text| text.chars().count()) as u64;

    match (bound("min"), bound("max")) {
        (Some(min), _) if len < min => Some(format!(
            "{} must be at least {} characters",
            spec.label, min
        )),
        (_, Some(max)) => Some(format!("{} must not exceed {} characters", spec.label, max)),
        _ => None,
    }
}

/// ValidatedJson
///
/// Body extractor: parses JSON and runs `validate_payload`. Every failure is a
/// 400 validation error. As a body extractor it always runs after the
/// header-based auth extractors.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: ValidatedPayload + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

        let payload = validate_payload::<T>(&raw).map_err(ApiError::Validation)?;
        Ok(ValidatedJson(payload))
    }
}
