use serde_json::Value;
use thiserror::Error;

use crate::envelope::ErrorBody;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{method} {url} returned {status}: {}", body_message(.body))]
    Http {
        method: String,
        url: String,
        status: u16,
        body: Value,
    },

    #[error("{method} {url} failed: {message}")]
    Network {
        method: String,
        url: String,
        message: String,
    },

    #[error("{method} {url} was cancelled")]
    Cancelled { method: String, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled { .. })
    }

    /// HTTP status when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ClientError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Value> {
        match self {
            ClientError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Typed view of the error body, if there is one and it is an object.
    pub fn error_body(&self) -> Option<ErrorBody> {
        self.body()
            .and_then(|body| serde_json::from_value(body.clone()).ok())
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            ClientError::Http { method, .. }
            | ClientError::Network { method, .. }
            | ClientError::Cancelled { method, .. } => Some(method),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::Http { url, .. }
            | ClientError::Network { url, .. }
            | ClientError::Cancelled { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Best human-readable message: the server's own message when it sent
    /// one, otherwise the error's display text.
    pub fn message(&self) -> String {
        match self {
            ClientError::Http { body, status, .. } => {
                let text = body_message(body);
                if text.is_empty() {
                    format!("Request failed with status code {}", status)
                } else {
                    text
                }
            }
            ClientError::Network { message, .. } => message.clone(),
            ClientError::Cancelled { .. } => "Request cancelled".to_string(),
            other => other.to_string(),
        }
    }
}

fn body_message(body: &Value) -> String {
    ErrorBody::message_of(body).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ClientError>;
