use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::Bytes;
use actix_web::{FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::Error;
use crate::validation;

/// A request body type that is validated before a handler ever sees it. The
/// fields are submitted nested under `ROOT`, e.g. `campground[title]`.
pub trait Submittable: DeserializeOwned + Validate {
    const ROOT: &'static str;
}

/// Extracts and validates a form or json body. Validation failures become a
/// single `Error::ValidationFailed` carrying every field error.
#[derive(Debug)]
pub struct Submission<T>(pub T);

impl<T> Submission<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Submittable + 'static> FromRequest for Submission<T> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Submission<T>, Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);
        let bytes = Bytes::from_request(req, payload);

        Box::pin(async move {
            let bytes = bytes
                .await
                .map_err(|err| Error::InvalidPayload(err.to_string()))?;

            let payload = if is_json {
                serde_json::from_slice(&bytes).map_err(Error::InvalidJson)?
            } else {
                parse_form(&bytes)?
            };

            let value = validation::check(payload, T::ROOT).map_err(|errors| {
                tracing::debug!(root = T::ROOT, count = errors.len(), "submission rejected");
                Error::ValidationFailed { errors }
            })?;

            Ok(Submission(value))
        })
    }
}

/// Accepts a json number or a numeric string, since every form value arrives
/// as text.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(number) => Ok(number),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| D::Error::custom(format!("must be a number, got {:?}", text))),
    }
}

/// Parses an urlencoded body, nesting bracketed keys so that
/// `campground[title]=x` becomes `{"campground": {"title": "x"}}`.
pub fn parse_form(bytes: &[u8]) -> Result<Value, Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes).map_err(Error::InvalidForm)?;

    let mut root = Map::new();
    for (key, value) in pairs {
        let path = split_key(&key);
        insert(&mut root, &path, value);
    }

    Ok(Value::Object(root))
}

fn split_key(key: &str) -> Vec<&str> {
    let (head, mut rest) = match key.find('[') {
        Some(index) => key.split_at(index),
        None => return vec![key],
    };

    let mut path = vec![head];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(end) => {
                path.push(&stripped[..end]);
                rest = &stripped[end + 1..];
            }
            None => break,
        }
    }

    path
}

fn insert(object: &mut Map<String, Value>, path: &[&str], value: String) {
    match path {
        [] => {}
        [last] => {
            object.insert(last.to_string(), Value::String(value));
        }
        [first, rest @ ..] => {
            let entry = object
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert(child, rest, value);
            }
        }
    }
}
