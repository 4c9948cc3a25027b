//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::RunArgs;
pub use defaults::{
    DEFAULT_EXPECTED_STATUS, DEFAULT_TEMPLATE, DEFAULT_TIMEOUT, DEFAULT_TRIALS, DEFAULT_UNIQUE_FIELD,
    DEFAULT_URL, DEFAULT_USER_AGENT, default_fixed_fields, default_headers,
    default_payload_config,
};
pub use types::{OutputFormat, PositiveUsize};

pub(crate) use parsers::{parse_field, parse_header};
