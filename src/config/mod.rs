//! Configuration loading and resolution.
mod apply;
mod loader;
mod parse;
pub mod types;


pub use apply::resolve_run;
pub use loader::load_config;
pub use types::{ConfigFile, RunSettings};

pub(crate) use loader::load_config_file;
pub(crate) use parse::parse_duration_value;
