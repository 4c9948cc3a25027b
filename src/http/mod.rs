//! HTTP transport shared by every trial in a batch.
mod body;
mod client;
mod failure;
mod transport;


pub use body::ResponseBody;
pub use client::HttpTransport;
pub use failure::{TransportErrorKind, TransportFailure};
pub use transport::{ProbeResponse, RawResponse, Transport};

pub(crate) use transport::collect_headers;
