use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Client;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, HttpError};
use crate::results::{TestResults, report_lines};

use super::cancel::Cancellation;
use super::interceptor::{RequestInterceptor, ResponseInterceptor};
use super::state::ClientState;

/// HTTP test client with its own cookie jar, interceptor chains,
/// cancellation generation and outcome log.
///
/// All methods take `&self`; the client can be shared through an [`Arc`]
/// and used from concurrent tasks.
pub struct RequestClient {
    pub(super) http: Client,
    pub(super) cancellation: Cancellation,
    state: Mutex<ClientState>,
}

impl RequestClient {
    /// Creates a client with an empty base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new() -> ClientResult<Self> {
        Self::from_config(&ClientConfig::default())
    }

    /// Creates a client seeded from a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error for malformed default headers or when the HTTP
    /// client cannot be built.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(user_agent) = config.user_agent.as_ref() {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::http(HttpError::BuildClientFailed { source: err }))?;

        let mut state = ClientState {
            default_headers: config.parsed_headers()?,
            ..ClientState::default()
        };
        if let Some(base_url) = config.base_url.as_ref() {
            state.base_url.clone_from(base_url);
        }
        if let Some(cookies) = config.cookies.as_ref() {
            for (name, value) in cookies {
                state.cookies.set(name.clone(), value.clone());
            }
        }
        if let Some(dir) = config.download_dir.as_ref() {
            state.download_dir.clone_from(dir);
        }

        Ok(Self {
            http,
            cancellation: Cancellation::new(),
            state: Mutex::new(state),
        })
    }

    pub(super) fn state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.state().base_url = base_url.into();
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        self.state().base_url.clone()
    }

    /// Directory used by [`RequestClient::download_file`].
    pub fn set_download_dir(&self, dir: impl Into<PathBuf>) {
        self.state().download_dir = dir.into();
    }

    pub fn add_request_interceptor<I>(&self, interceptor: I)
    where
        I: RequestInterceptor + 'static,
    {
        self.state().request_interceptors.push(Arc::new(interceptor));
    }

    pub fn add_response_interceptor<I>(&self, interceptor: I)
    where
        I: ResponseInterceptor + 'static,
    {
        self.state()
            .response_interceptors
            .push(Arc::new(interceptor));
    }

    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
        self.state().cookies.set(name, value);
    }

    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        self.state().cookies.get(name).map(str::to_owned)
    }

    #[must_use]
    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.state().cookies.snapshot()
    }

    /// Cancels every request currently in flight. Requests started after
    /// this call are unaffected.
    pub fn cancel_request(&self) {
        let generation = self.cancellation.cancel();
        info!("Cancelled in-flight requests; now on generation {}.", generation);
    }

    /// Snapshot of every recorded outcome so far.
    #[must_use]
    pub fn results(&self) -> TestResults {
        self.state().results.clone()
    }

    /// Prints one line per recorded outcome followed by the totals, and
    /// returns the same lines. Does not reset anything.
    pub fn run_tests(&self) -> Vec<String> {
        let lines = report_lines(&self.state().results);
        for line in &lines {
            println!("{}", line);
        }
        lines
    }

    /// Logs a failure raised before a request reached the network and hands
    /// it back unchanged.
    pub(super) fn handle_global_error(&self, err: ClientError) -> ClientError {
        error!(
            "Global Error (generation {}): {}",
            self.cancellation.current(),
            err
        );
        err
    }
}
