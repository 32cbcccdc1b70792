use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::debug;

/// Name/value cookie store; the newest write for a name wins.
#[derive(Debug, Clone, Default)]
pub(super) struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub(super) fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub(super) fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub(super) fn snapshot(&self) -> BTreeMap<String, String> {
        self.cookies.clone()
    }

    /// `Cookie` header value for the whole jar, `None` when empty.
    pub(super) fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Some(pairs.join("; "))
    }

    /// Stores every `Set-Cookie` header of a response.
    pub(super) fn harvest(&mut self, headers: &HeaderMap) {
        for raw in headers.get_all(SET_COOKIE) {
            let Ok(raw) = raw.to_str() else {
                debug!("Skipping non UTF-8 Set-Cookie header.");
                continue;
            };
            if let Some((name, value)) = parse_set_cookie(raw) {
                self.set(name, value);
            }
        }
    }
}

/// Extracts the leading `name=value` pair; attributes such as `Path` or
/// `Expires` are ignored.
pub(super) fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_owned(), value.trim().to_owned()))
}
