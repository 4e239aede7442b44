//! Request helpers shared by the handlers
//!
//! Missing fields surface as `"<field> key is missing"`, the wording the
//! console forms match on.

use std::collections::HashMap;
use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use http::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::util::parse_id;

use crate::catalog::PendingImage;

/// JSON body whose rejections render as `{"error": ...}`
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(JsonRejection::JsonDataError(e)) => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                e.body_text(),
            )),
            Err(JsonRejection::JsonSyntaxError(e)) => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                e.body_text(),
            )),
            Err(rejection) => {
                tracing::debug!("JSON body rejected: {rejection}");
                Err(AppError::with_message(
                    ErrorCode::InvalidRequest,
                    "Request data/body is missing",
                ))
            }
        }
    }
}

/// Fallback for a method a route does not serve
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::with_message(
        ErrorCode::MethodNotAllowed,
        format!("{method} Method not supported"),
    )
}

pub fn missing(key: &str) -> AppError {
    AppError::required(format!("{key} key is missing"))
}

/// A required value; empty strings count as missing
pub fn required_text(value: Option<String>, key: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(key))
}

pub fn required<T>(value: Option<T>, key: &str) -> AppResult<T> {
    value.ok_or_else(|| missing(key))
}

/// Document id sent either as a JSON number or as a string
pub fn doc_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id > 0),
        Value::String(s) => parse_id(s),
        _ => None,
    }
}

/// `_id` of a JSON edit body: absent or blank is a 400, unparsable is `None`
pub fn edit_id(value: Option<&Value>) -> AppResult<Option<i64>> {
    match value {
        None | Some(Value::Null) => Err(missing("_id")),
        Some(Value::String(s)) if s.trim().is_empty() => Err(missing("_id")),
        Some(value) => Ok(doc_id(value)),
    }
}

/// `?id=` of the fetch endpoints
#[derive(Debug, Default, Deserialize)]
pub struct FetchQuery {
    pub id: Option<String>,
}

impl FetchQuery {
    /// `None` lists everything; an unparsable id is a 404 worded after `label`
    pub fn id(&self, label: &str) -> AppResult<Option<i64>> {
        match self.id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_id(raw).map(Some).ok_or_else(|| {
                AppError::not_found(format!(
                    "Invalid {} id. {} does not exist",
                    label.to_lowercase(),
                    label
                ))
            }),
        }
    }
}

/// Multipart form: text fields by name, every file part as a pending image
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub files: Vec<PendingImage>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                    form.files.push(PendingImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Field present, possibly empty
    pub fn text(&self, key: &str) -> AppResult<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| missing(key))
    }

    pub fn non_empty(&self, key: &str) -> AppResult<&str> {
        let value = self.text(key)?.trim();
        if value.is_empty() {
            return Err(missing(key));
        }
        Ok(value)
    }

    pub fn number<T: FromStr>(&self, key: &str) -> AppResult<T> {
        self.non_empty(key)?.parse().map_err(|_| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{key} must be a number"))
        })
    }

    /// A JSON-encoded field; `undefined` and `null` are refused
    pub fn json<T: DeserializeOwned>(&self, key: &str) -> AppResult<T> {
        let raw = self.text(key)?.trim();
        if raw.is_empty() || raw == "undefined" || raw == "null" {
            return Err(AppError::required(format!("{key} must have a non-null value")));
        }
        serde_json::from_str(raw).map_err(|e| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{key} is malformed: {e}"))
        })
    }

    /// First present id field among `keys`
    pub fn id(&self, keys: &[&str]) -> AppResult<Option<i64>> {
        let primary = keys.first().copied().unwrap_or("id");
        let raw = keys
            .iter()
            .find_map(|key| self.fields.get(*key))
            .ok_or_else(|| missing(primary))?;
        Ok(parse_id(raw))
    }

    #[cfg(test)]
    pub(crate) fn with_fields(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: Vec::new(),
        }
    }
}
