use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> FieldError {
        FieldError {
            path: path.into(),
            message: message.into(),
        }
    }

    fn at(path: &str, problem: impl Display) -> FieldError {
        FieldError {
            path: path.to_string(),
            message: format!("\"{}\" {}", path, problem),
        }
    }
}

/// Pulls the object under `root` out of `payload`, deserializes it and runs
/// its validation rules. Every rule violation is reported, while a payload
/// that cannot be deserialized at all stops at the first structural problem.
pub fn check<T>(payload: Value, root: &str) -> Result<T, Vec<FieldError>>
where
    T: DeserializeOwned + Validate,
{
    let mut top = match payload {
        Value::Object(top) => top,
        _ => return Err(vec![FieldError::at("value", "must be of type object")]),
    };

    let mut errors: Vec<FieldError> = top
        .keys()
        .filter(|key| *key != root)
        .map(|key| FieldError::at(key, "is not allowed"))
        .collect();

    let object = match top.remove(root) {
        Some(object @ Value::Object(_)) => object,
        Some(_) => {
            errors.push(FieldError::at(root, "must be of type object"));
            return Err(errors);
        }
        None => {
            errors.push(FieldError::at(root, "is required"));
            return Err(errors);
        }
    };

    let value: T = match serde_json::from_value(object) {
        Ok(value) => value,
        Err(err) => {
            errors.push(structural_error(root, &err));
            return Err(errors);
        }
    };

    if let Err(violations) = value.validate() {
        errors.extend(rule_errors(root, &violations));
    }

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

fn structural_error(root: &str, err: &serde_json::Error) -> FieldError {
    let message = err.to_string();

    if let Some(field) = quoted_field(&message, "missing field `") {
        return FieldError::at(&format!("{}.{}", root, field), "is required");
    }
    if let Some(field) = quoted_field(&message, "unknown field `") {
        return FieldError::at(&format!("{}.{}", root, field), "is not allowed");
    }

    FieldError::at(root, message)
}

fn quoted_field<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    message.strip_prefix(prefix)?.split('`').next()
}

fn rule_errors(root: &str, violations: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = violations
        .field_errors()
        .into_iter()
        .map(|(field, errors)| (field.to_string(), errors))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            let path = format!("{}.{}", root, field);
            errors
                .iter()
                .map(move |error| FieldError::at(&path, describe(error)))
        })
        .collect()
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).and_then(Value::as_f64);
    match error.code.as_ref() {
        "range" => match (param("value"), param("min"), param("max")) {
            (Some(value), _, Some(max)) if value > max => {
                format!("must be less than or equal to {}", max)
            }
            (_, Some(min), _) => format!("must be greater than or equal to {}", min),
            (_, _, Some(max)) => format!("must be less than or equal to {}", max),
            _ => "is out of range".to_string(),
        },
        code => format!("failed the {} rule", code),
    }
}
