//! Per-request options.

use std::time::Duration;

use crate::traits::{set_header, Headers};

/// Options for a single call. Unset fields fall back to the client defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Count the call in the client's loading indicator
    pub loading: Option<bool>,
    /// Log a rejected call at debug level instead of warn
    pub silent: Option<bool>,
    pub timeout: Option<Duration>,
    /// Extra headers; they win over the defaults on a name clash
    pub headers: Headers,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = Some(silent);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    /// `overrides` layered on top of `self`.
    pub fn merge(&self, overrides: Option<&RequestConfig>) -> RequestConfig {
        let Some(overrides) = overrides else {
            return self.clone();
        };
        let mut headers = self.headers.clone();
        for (name, value) in &overrides.headers {
            set_header(&mut headers, name.as_str(), value.as_str());
        }
        RequestConfig {
            loading: overrides.loading.or(self.loading),
            silent: overrides.silent.or(self.silent),
            timeout: overrides.timeout.or(self.timeout),
            headers,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.unwrap_or(false)
    }

    pub fn is_silent(&self) -> bool {
        self.silent.unwrap_or(false)
    }
}
