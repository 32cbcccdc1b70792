use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult, HttpError};

use super::RequestClient;
use super::interceptor::RequestInterceptor;
use super::request::{
    HttpMethod, OutgoingRequest, Payload, RequestOptions, apply_query, insert_header,
};
use super::response::{ApiResponse, Dispatch, ResponseBody};

const JSON_CONTENT_TYPE: &str = "application/json";

impl RequestClient {
    /// Sends one request and records a passing outcome once the body has
    /// been buffered.
    ///
    /// The URL is the base URL followed by `path`. GET payloads become the
    /// query string, any other payload becomes the body. Response
    /// interceptors and cookie harvesting run before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be assembled or the
    /// transport fails. Cancellation is not an error: it resolves to
    /// [`Dispatch::Cancelled`].
    pub async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Payload>,
        description: &str,
        started: Instant,
        options: &RequestOptions,
    ) -> ClientResult<Dispatch> {
        let mut token = self.cancellation.token();

        let (mut outgoing, interceptors) = self
            .prepare_request(method, path, payload, options)
            .map_err(|err| self.handle_global_error(err))?;
        for interceptor in &interceptors {
            interceptor.intercept(&mut outgoing);
        }
        let url = outgoing.url.to_string();
        let request = outgoing
            .into_request(&self.http)
            .map_err(|err| self.handle_global_error(err))?;

        debug!("{} {} (generation {})", method, url, token.generation());

        let exchange = async {
            let response = self.http.execute(request).await.map_err(|err| {
                ClientError::http(HttpError::RequestFailed {
                    url: url.clone(),
                    source: err,
                })
            })?;
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = response.bytes().await.map_err(|err| {
                ClientError::http(HttpError::ReadBody {
                    url: url.clone(),
                    source: err,
                })
            })?;
            Ok::<(StatusCode, HeaderMap, Bytes), ClientError>((status, headers, bytes))
        };

        let exchanged = tokio::select! {
            () = token.cancelled() => {
                info!("Request canceled: {} {}", method, url);
                return Ok(Dispatch::Cancelled);
            }
            result = exchange => result,
        };
        // Superseded responses never reach the response interceptors.
        let (status, headers, bytes) = match exchanged {
            Ok(_) | Err(_) if token.is_cancelled() => {
                info!("Request canceled: {} {}", method, url);
                return Ok(Dispatch::Cancelled);
            }
            Ok(parts) => parts,
            Err(err) => return Err(err),
        };

        let mut response = ApiResponse {
            status,
            headers,
            body: ResponseBody::decode(&bytes),
        };
        let response_interceptors = self.state().response_interceptors.clone();
        for interceptor in &response_interceptors {
            interceptor.intercept(&mut response);
        }

        let elapsed = started.elapsed();
        {
            let mut state = self.state();
            if token.is_cancelled() {
                drop(state);
                info!("Request canceled: {} {}", method, url);
                return Ok(Dispatch::Cancelled);
            }
            state.results.record_pass(description, elapsed);
            state.cookies.harvest(&response.headers);
        }
        debug!(
            "{} {} -> {} in {}ms",
            method,
            url,
            response.status.as_u16(),
            elapsed.as_millis()
        );

        Ok(Dispatch::Completed(response))
    }

    /// Dispatches without any schema check and returns the raw outcome.
    ///
    /// # Errors
    ///
    /// Same as [`RequestClient::make_request`].
    pub async fn inspect_response(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Payload>,
        description: &str,
        options: &RequestOptions,
    ) -> ClientResult<Dispatch> {
        self.make_request(method, path, payload, description, Instant::now(), options)
            .await
    }

    pub(super) fn prepare_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Payload>,
        options: &RequestOptions,
    ) -> ClientResult<(OutgoingRequest, Vec<Arc<dyn RequestInterceptor>>)> {
        let (base_url, default_headers, cookie_header, interceptors) = {
            let state = self.state();
            (
                state.base_url.clone(),
                state.default_headers.clone(),
                state.cookies.header_value(),
                state.request_interceptors.clone(),
            )
        };

        let raw_url = format!("{}{}", base_url, path);
        let mut url = Url::parse(&raw_url).map_err(|err| {
            ClientError::http(HttpError::InvalidUrl {
                url: raw_url.clone(),
                source: err,
            })
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        for (name, value) in &default_headers {
            insert_header(&mut headers, name, value)?;
        }
        if let Some(cookie) = cookie_header.as_deref() {
            insert_header(&mut headers, "Cookie", cookie)?;
        }
        for (name, value) in &options.headers {
            insert_header(&mut headers, name, value)?;
        }

        let body = match payload {
            Some(payload) if method == HttpMethod::Get => {
                apply_query(&mut url, &payload);
                None
            }
            Some(payload) => {
                let body = payload.into_body()?;
                headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
                Some(body)
            }
            None => None,
        };

        Ok((
            OutgoingRequest {
                method,
                url,
                headers,
                body,
            },
            interceptors,
        ))
    }
}
