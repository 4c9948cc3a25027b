use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::http::{ResponseBody, TransportFailure};
use crate::payload::TrialRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrialOutcome {
    /// Response carried exactly the expected status.
    Success,
    /// Response received with any other status.
    HttpFailure,
    /// No response was obtained.
    TransportError,
}

impl TrialOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TrialOutcome::Success => "success",
            TrialOutcome::HttpFailure => "http_failure",
            TrialOutcome::TransportError => "transport_error",
        }
    }
}

impl fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrialReply {
    Response(ResponseRecord),
    Failed(TransportFailure),
}

/// Outcome of one trial. Built once by the trial runner (or the dispatcher
/// for a trial task that died) and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    index: usize,
    unique_field: String,
    outcome: TrialOutcome,
    elapsed: Option<Duration>,
    elapsed_since_batch_start: Duration,
    reply: TrialReply,
}

impl TrialResult {
    #[must_use]
    pub fn from_response(
        request: &TrialRequest,
        response: ResponseRecord,
        expected_status: u16,
        elapsed: Duration,
        elapsed_since_batch_start: Duration,
    ) -> Self {
        let outcome = if response.status == expected_status {
            TrialOutcome::Success
        } else {
            TrialOutcome::HttpFailure
        };
        Self {
            index: request.index,
            unique_field: request.unique_field.clone(),
            outcome,
            elapsed: Some(elapsed),
            elapsed_since_batch_start,
            reply: TrialReply::Response(response),
        }
    }

    /// `elapsed` is the time until the failure surfaced, when the
    /// submission was attempted at all.
    #[must_use]
    pub fn from_failure(
        request: &TrialRequest,
        failure: TransportFailure,
        elapsed: Option<Duration>,
        elapsed_since_batch_start: Duration,
    ) -> Self {
        Self {
            index: request.index,
            unique_field: request.unique_field.clone(),
            outcome: TrialOutcome::TransportError,
            elapsed,
            elapsed_since_batch_start,
            reply: TrialReply::Failed(failure),
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn unique_field(&self) -> &str {
        &self.unique_field
    }

    #[must_use]
    pub const fn outcome(&self) -> TrialOutcome {
        self.outcome
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, TrialOutcome::Success)
    }

    /// Submission time, from just before the request to the decoded body.
    #[must_use]
    pub const fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    #[must_use]
    pub const fn elapsed_since_batch_start(&self) -> Duration {
        self.elapsed_since_batch_start
    }

    #[must_use]
    pub const fn reply(&self) -> &TrialReply {
        &self.reply
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match &self.reply {
            TrialReply::Response(response) => Some(response.status),
            TrialReply::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn response_headers(&self) -> Option<&BTreeMap<String, String>> {
        match &self.reply {
            TrialReply::Response(response) => Some(&response.headers),
            TrialReply::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn body(&self) -> Option<&ResponseBody> {
        match &self.reply {
            TrialReply::Response(response) => Some(&response.body),
            TrialReply::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn error_detail(&self) -> Option<&TransportFailure> {
        match &self.reply {
            TrialReply::Response(_) => None,
            TrialReply::Failed(failure) => Some(failure),
        }
    }
}
