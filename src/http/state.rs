use std::path::PathBuf;
use std::sync::Arc;

use crate::results::TestResults;

use super::cookies::CookieJar;
use super::interceptor::{RequestInterceptor, ResponseInterceptor};

/// Everything one client mutates between requests.
pub(super) struct ClientState {
    pub(super) base_url: String,
    pub(super) default_headers: Vec<(String, String)>,
    pub(super) cookies: CookieJar,
    pub(super) request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    pub(super) response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    pub(super) results: TestResults,
    pub(super) download_dir: PathBuf,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            default_headers: Vec::new(),
            cookies: CookieJar::default(),
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            results: TestResults::default(),
            download_dir: PathBuf::from("."),
        }
    }
}
