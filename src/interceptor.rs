use crate::client::ApiResponse;
use crate::config::Config;
use crate::error::ClientError;
use crate::normalizer::{normalize_error, normalize_success};

/// Hook the transport runs on every response before handing it to the caller.
#[derive(Debug, Clone, Copy)]
pub struct Interceptor {
    diagnostics: bool,
}

impl Interceptor {
    pub fn new(diagnostics: bool) -> Self {
        Self { diagnostics }
    }

    /// Diagnostics are on everywhere except production.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.is_production())
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    pub fn on_response(&self, response: &mut ApiResponse) {
        let body = std::mem::take(&mut response.data);
        response.data = normalize_success(body);
    }

    /// Fills the gaps of the error body (if the server sent one), logs it,
    /// and hands the error back for the caller to propagate.
    pub fn on_error(&self, mut error: ClientError) -> ClientError {
        if let Some(body) = error.body_mut() {
            normalize_error(body);
        }
        if let Some(line) = self.diagnostic(&error) {
            tracing::warn!(target: "deuce_api_client::interceptor", "{}", line);
        }
        error
    }

    /// The diagnostic line for `error`, or `None` when nothing should be
    /// logged: diagnostics are off, or the request was cancelled on purpose.
    pub fn diagnostic(&self, error: &ClientError) -> Option<String> {
        if !self.diagnostics || error.is_cancelled() {
            return None;
        }
        let method = error.method().unwrap_or("REQUEST");
        let url = error.url().unwrap_or("-");
        Some(format!("API Error: {} {} {}", method, url, error.message()))
    }
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new(true)
    }
}
