//! Request body extraction.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use axum::Form;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ApiError;

/// Body encodings the API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return Self::Other;
        };

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "application/json" {
            Self::Json
        } else if mime == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Other
        }
    }
}

/// The request body as a JSON object, whatever encoding it arrived in.
///
/// Unknown content types and JSON arrays yield an empty object, so the
/// handler's field checks decide the outcome. Malformed bodies are faults,
/// and so is JSON whose top level is neither an object nor an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody(pub Map<String, Value>);

impl RequestBody {
    fn from_json(bytes: &[u8]) -> Result<Self, ApiError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let first = bytes
            .iter()
            .find(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
        if !matches!(first, Some(b'{') | Some(b'[')) {
            return Err(ApiError::internal(
                "JSON body must be an object or an array",
            ));
        }

        match serde_json::from_slice::<Value>(bytes).map_err(ApiError::internal)? {
            Value::Object(map) => Ok(Self(map)),
            other => {
                debug!(kind = ?other, "ignoring non-object JSON body");
                Ok(Self::default())
            }
        }
    }

    /// `key[]=v` pairs and repeated keys collect into arrays.
    fn from_form(pairs: Vec<(String, String)>) -> Self {
        let mut map = Map::new();
        for (key, value) in pairs {
            let (key, is_list) = match key.strip_suffix("[]") {
                Some(stripped) => (stripped.to_string(), true),
                None => (key, false),
            };
            let value = Value::String(value);

            match map.entry(key) {
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Value::Array(items) => items.push(value),
                    existing => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, value]);
                    }
                },
                Entry::Vacant(slot) if is_list => {
                    slot.insert(Value::Array(vec![value]));
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
        Self(map)
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for RequestBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::from_headers(req.headers()) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(ApiError::internal)?;
                Self::from_json(&bytes)
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(ApiError::internal)?;
                Ok(Self::from_form(pairs))
            }
            BodyKind::Other => Ok(Self::default()),
        }
    }
}
