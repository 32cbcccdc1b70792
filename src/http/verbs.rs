use serde_json::{Value, json};
use tokio::time::Instant;

use crate::error::{ClientError, ClientResult, SchemaError};
use crate::schema::Schema;

use super::RequestClient;
use super::request::{HttpMethod, Payload, RequestOptions};
use super::response::{Dispatch, ResponseBody};

impl RequestClient {
    /// Dispatches a request and checks the decoded body against `schema`.
    ///
    /// Any failure is recorded as a failing outcome before it is returned;
    /// the caller decides whether the run continues. A cancelled request
    /// returns [`ClientError::Cancelled`] and records nothing.
    ///
    /// # Errors
    ///
    /// Returns transport errors unchanged and a [`SchemaError`] holding
    /// every violation when the body does not match.
    pub async fn test(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Payload>,
        schema: Option<&dyn Schema>,
        description: &str,
        options: &RequestOptions,
    ) -> ClientResult<ResponseBody> {
        let started = Instant::now();
        let outcome = async {
            let response = match self
                .make_request(method, path, payload, description, started, options)
                .await?
            {
                Dispatch::Completed(response) => response,
                Dispatch::Cancelled => return Err(ClientError::Cancelled),
            };

            if let Some(schema) = schema {
                let violations = schema.validate(&response.body.to_value()).await;
                if !violations.is_empty() {
                    return Err(ClientError::from(SchemaError { violations }));
                }
            }

            Ok::<ResponseBody, ClientError>(response.body)
        }
        .await;

        match outcome {
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                self.state().results.record_fail(description);
                Err(err)
            }
            Ok(body) => Ok(body),
        }
    }

    /// # Errors
    ///
    /// See [`RequestClient::test`].
    pub async fn get(
        &self,
        path: &str,
        params: Option<Value>,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        self.verb(HttpMethod::Get, path, params, schema, description, headers)
            .await
    }

    /// # Errors
    ///
    /// See [`RequestClient::test`].
    pub async fn post(
        &self,
        path: &str,
        data: Option<Value>,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        self.verb(HttpMethod::Post, path, data, schema, description, headers)
            .await
    }

    /// # Errors
    ///
    /// See [`RequestClient::test`].
    pub async fn put(
        &self,
        path: &str,
        data: Option<Value>,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        self.verb(HttpMethod::Put, path, data, schema, description, headers)
            .await
    }

    /// # Errors
    ///
    /// See [`RequestClient::test`].
    pub async fn patch(
        &self,
        path: &str,
        data: Option<Value>,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        self.verb(HttpMethod::Patch, path, data, schema, description, headers)
            .await
    }

    /// `params` travel as a JSON body, like every non-GET payload.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::test`].
    pub async fn delete(
        &self,
        path: &str,
        params: Option<Value>,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        self.verb(HttpMethod::Delete, path, params, schema, description, headers)
            .await
    }

    /// POSTs credentials; any session cookie in the reply lands in the jar.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::test`].
    pub async fn login(
        &self,
        path: &str,
        payload: Value,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        self.verb(
            HttpMethod::Post,
            path,
            Some(payload),
            schema,
            description,
            headers,
        )
        .await
    }

    async fn verb(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<Value>,
        schema: Option<&dyn Schema>,
        description: &str,
        headers: &[(&str, &str)],
    ) -> ClientResult<ResponseBody> {
        let payload = Payload::Json(data.unwrap_or_else(|| json!({})));
        let options = RequestOptions::from(headers);
        self.test(method, path, Some(payload), schema, description, &options)
            .await
    }
}
