//! Single-file check command handler

use super::utils;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use mlcheck_core::{DialectChoice, DialectSource};
use tracing::{info, instrument};

/// Handle the check command
#[instrument(skip(args, config, output), fields(file = %args.input.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("check_command", &format!("file: {}", args.input.display()));

    utils::ensure_exists(&args.input)?;
    if args.input.is_dir() {
        return Err(Error::invalid_args(format!(
            "Input path is a directory. To scan a directory, use 'mlcheck scan {} --all [x|h]'.",
            args.input.display()
        )));
    }

    let session = utils::build_session(&args.validation, config)?;
    let choice = match args.validation.informat {
        Some(format) => DialectChoice::Fixed(format.into()),
        None => DialectChoice::default(),
    };

    let report = session.validate_file(&args.input, choice)?;

    if report.dialect_source == DialectSource::Fallback {
        output.warning(&format!(
            "Could not determine file type for {}. Forcing {}.",
            args.input.display(),
            report.outcome.dialect
        ))?;
    }

    output.document(&report, args.validation.stat)?;

    info!(
        dialect = %report.outcome.dialect,
        encoding = %report.encoding,
        errors = report.outcome.stats.error_count,
        "check finished"
    );

    utils::check_failure(report.outcome.stats.error_count, &args.validation, config)
}
