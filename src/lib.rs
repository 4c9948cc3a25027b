//! Concurrent registration-endpoint load harness.
//!
//! A batch fires N uniquely-keyed registration payloads at one endpoint at
//! once. Each trial sends an optional CORS-style `OPTIONS` probe followed by
//! a JSON `POST`; results come back in trial order and are folded into a
//! [`metrics::BatchSummary`]. The `regburst` binary wraps this with a CLI,
//! config files, and text or JSON reporting.
pub mod app;
pub mod args;
pub mod batch;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod payload;
