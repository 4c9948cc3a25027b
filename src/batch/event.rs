use tokio::sync::mpsc;

use crate::http::{ProbeResponse, TransportFailure};

use super::TrialResult;

pub type EventSender = mpsc::UnboundedSender<TrialEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<TrialEvent>;

/// Progress emitted while a batch runs, in completion order.
#[derive(Debug, Clone)]
pub enum TrialEvent {
    /// Capability probe finished. Informational only.
    Probed {
        index: usize,
        outcome: Result<ProbeResponse, TransportFailure>,
    },
    Finished(TrialResult),
}

#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// A closed receiver only means nobody is listening anymore.
pub(super) fn emit(events: Option<&EventSender>, event: TrialEvent) {
    if let Some(sender) = events {
        drop(sender.send(event));
    }
}
