use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Best-effort decode of a buffered body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// JSON when the bytes parse as JSON, lossy UTF-8 text otherwise.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text.as_str()),
        }
    }

    /// Text bodies become a JSON string.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => Value::String(text.clone()),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }
}

/// A buffered response; response interceptors may rewrite any part of it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

/// Result of one dispatch.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Completed(ApiResponse),
    /// Superseded by `cancel_request`; nothing was recorded.
    Cancelled,
}

impl Dispatch {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Dispatch::Cancelled)
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Cancelled`] for a cancelled dispatch.
    pub fn into_response(self) -> ClientResult<ApiResponse> {
        match self {
            Dispatch::Completed(response) => Ok(response),
            Dispatch::Cancelled => Err(ClientError::Cancelled),
        }
    }
}
