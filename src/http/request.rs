use std::fmt;

use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult, HttpError};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub(super) fn to_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request data: a JSON document or raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Bytes(Bytes),
}

impl Payload {
    pub(super) fn into_body(self) -> ClientResult<Bytes> {
        match self {
            Payload::Json(value) => serde_json::to_vec(&value)
                .map(Bytes::from)
                .map_err(|err| ClientError::http(HttpError::SerializeBody { source: err })),
            Payload::Bytes(bytes) => Ok(bytes),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

/// Per-call extras. Headers here override everything the client adds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl From<&[(&str, &str)]> for RequestOptions {
    fn from(headers: &[(&str, &str)]) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
        }
    }
}

/// One entry of a concurrent batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<Payload>,
    pub description: String,
    pub options: RequestOptions,
}

impl RequestSpec {
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            description: description.into(),
            options: RequestOptions::default(),
        }
    }

    #[must_use]
    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.header(name, value);
        self
    }
}

/// The request as request interceptors see it.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutgoingRequest {
    /// Sets `Content-Length` from the current body, or removes it when there
    /// is none. Interceptors may have replaced the body after preparation.
    pub(super) fn sync_content_length(&mut self) {
        self.headers.remove(CONTENT_LENGTH);
        if let Some(body) = &self.body {
            self.headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }
    }

    pub(super) fn into_request(mut self, client: &Client) -> ClientResult<Request> {
        self.sync_content_length();
        let mut builder = client
            .request(self.method.to_reqwest(), self.url)
            .headers(self.headers);
        if let Some(body) = self.body {
            builder = builder.body(body);
        }
        builder
            .build()
            .map_err(|err| ClientError::http(HttpError::BuildRequestFailed { source: err }))
    }
}

/// Inserts or replaces a header, so later calls win.
pub(super) fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> ClientResult<()> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
        ClientError::http(HttpError::InvalidHeaderName {
            header: name.to_owned(),
            source: err,
        })
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|err| {
        ClientError::http(HttpError::InvalidHeaderValue {
            header: name.to_owned(),
            source: err,
        })
    })?;
    headers.insert(header_name, header_value);
    Ok(())
}

/// Replaces the query string with the entries of a JSON object.
///
/// Arrays repeat their key, `null` becomes an empty value and every other
/// non-string value uses its JSON text. An empty object leaves the URL alone.
pub(super) fn apply_query(url: &mut Url, payload: &Payload) {
    let Payload::Json(Value::Object(entries)) = payload else {
        debug!("Ignoring non-object payload on GET request.");
        return;
    };
    if entries.is_empty() {
        return;
    }

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in entries {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.append_pair(key, &query_value(item));
                }
            }
            other => {
                pairs.append_pair(key, &query_value(other));
            }
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
