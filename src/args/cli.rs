use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_field, parse_header, parse_positive_usize};
use super::types::{OutputFormat, PositiveUsize};

/// Every option is optional: unset values come from the config file, then
/// from the compiled-in defaults.
#[derive(Debug, Parser, Clone, Default)]
#[clap(
    version,
    about = "Fire a burst of concurrent, uniquely-keyed registration requests (with CORS preflight) at one endpoint and report how it copes."
)]
pub struct RunArgs {
    /// Config file (TOML or JSON); defaults to ./regburst.toml or ./regburst.json when present
    #[arg(long, short = 'C')]
    pub config: Option<String>,

    /// Registration endpoint [default: http://localhost:8001/register]
    #[arg(long, short, env = "REGBURST_URL")]
    pub url: Option<String>,

    /// Extra or overriding header in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Number of concurrent trials in the batch [default: 10]
    #[arg(long, short = 'n', value_parser = parse_positive_usize)]
    pub trials: Option<PositiveUsize>,

    /// Connection ceiling shared by all trials [default: number of trials]
    #[arg(
        long = "max-connections",
        short = 'c',
        alias = "concurrency",
        value_parser = parse_positive_usize
    )]
    pub max_connections: Option<PositiveUsize>,

    /// Per-trial timeout (supports ms/s/m/h) [default: 30s]
    #[arg(long, short = 't', value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Status code that counts as success, matched exactly [default: 200]
    #[arg(long)]
    pub status: Option<u16>,

    /// JSON key carrying the unique value [default: email]
    #[arg(long = "unique-field")]
    pub unique_field: Option<String>,

    /// Template for the unique value; must contain {{unique}} [default: user_{{unique}}@example.com]
    #[arg(long)]
    pub template: Option<String>,

    /// Fixed payload field in 'name=value' format (repeatable; overrides defaults)
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Skip the OPTIONS capability probe before each submission
    #[arg(long = "no-probe")]
    pub no_probe: bool,

    /// Output format
    #[arg(long = "output-format", short = 'o', ignore_case = true)]
    pub output_format: Option<OutputFormat>,

    /// Omit response headers and bodies from per-trial output
    #[arg(long)]
    pub brief: bool,

    /// Write the run document (summary and trials) as JSON
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Write the summary and one line per trial as JSON Lines
    #[arg(long = "export-jsonl")]
    pub export_jsonl: Option<String>,

    /// Exit non-zero when any trial is not a success
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,

    /// Enable debug logging (overridden by REGBURST_LOG / RUST_LOG)
    #[arg(long, short)]
    pub verbose: bool,
}
