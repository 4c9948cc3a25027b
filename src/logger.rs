use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Checked before `RUST_LOG`.
const LOG_ENV: &str = "REGBURST_LOG";

fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "warn" };
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// Installs the global subscriber. Diagnostics go to stderr so stdout only
/// carries the report. A second call leaves the first subscriber in place.
pub fn init_logging(verbose: bool) {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Logging already initialised: {}", err);
    }
}
