//! Trial execution and concurrent batch dispatch.
mod config;
mod dispatcher;
mod event;
mod result;
mod runner;


pub use config::BatchConfig;
pub use dispatcher::{BatchDispatcher, run_batch};
pub use event::{EventReceiver, EventSender, TrialEvent, event_channel};
pub use result::{ResponseRecord, TrialOutcome, TrialReply, TrialResult};
pub use runner::{TrialSettings, run_trial};
