use clap::Parser;

use crate::args::RunArgs;
use crate::error::{AppError, AppResult, ValidationError};

/// Process entry: flags, logging, config resolution, then one batch on a
/// multi-threaded runtime.
///
/// # Errors
///
/// Returns an error when configuration is invalid, the runtime cannot be
/// built, the run itself fails, or `--fail-on-error` is set and a trial
/// failed.
pub fn run() -> AppResult<()> {
    let args = RunArgs::parse();
    crate::logger::init_logging(args.verbose);

    let file = crate::config::load_config(args.config.as_deref())?;
    let (batch, settings) = crate::config::resolve_run(&args, file)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            AppError::validation(ValidationError::RuntimeBuildFailed { source: err })
        })?;

    runtime.block_on(crate::app::run(batch, settings))
}
