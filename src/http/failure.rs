use std::fmt;

use thiserror::Error;

/// Coarse category of a request that produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Redirect,
    Builder,
    /// The trial task ended without producing a result.
    Aborted,
    Other,
}

impl TransportErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "Timeout",
            TransportErrorKind::Connect => "Connect",
            TransportErrorKind::Request => "Request",
            TransportErrorKind::Body => "Body",
            TransportErrorKind::Redirect => "Redirect",
            TransportErrorKind::Builder => "Builder",
            TransportErrorKind::Aborted => "Aborted",
            TransportErrorKind::Other => "Other",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportFailure {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(limit: std::time::Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("no response within {}ms", limit.as_millis()),
        )
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        // Timeout first: reqwest also flags connect timeouts as connect errors.
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_builder() {
            TransportErrorKind::Builder
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else if err.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, error_chain(&err))
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
