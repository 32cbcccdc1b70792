use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{ClientError, ClientResult, ConfigError};

use super::parse::parse_header;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    /// Extra headers sent with every request, as `Key: Value` lines.
    pub headers: Option<Vec<String>>,
    /// Cookies placed in the jar before the first request.
    pub cookies: Option<BTreeMap<String, String>>,
    pub download_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Parses [`ClientConfig::headers`] into name/value pairs.
    ///
    /// # Errors
    ///
    /// Returns an error for the first malformed header line.
    pub fn parsed_headers(&self) -> ClientResult<Vec<(String, String)>> {
        let Some(lines) = self.headers.as_ref() else {
            return Ok(Vec::new());
        };
        lines
            .iter()
            .map(|line| {
                parse_header(line).map_err(|err| {
                    ClientError::config(ConfigError::InvalidHeader { source: err })
                })
            })
            .collect()
    }
}
