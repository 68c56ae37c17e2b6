//! Shared utilities for command handlers

use crate::cli::ValidationArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use mlcheck_core::{SchemaRule, ValidationSession};
use std::path::Path;
use tracing::debug;

/// Fail with [`Error::FileNotFound`] when `path` does not exist
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Build a session with the schema rule from the flags or the configuration
pub fn build_session(args: &ValidationArgs, config: &Config) -> Result<ValidationSession> {
    let schema = args.schema.as_deref().or(config.validation.schema.as_deref());

    match schema {
        Some(name) => {
            let rule = SchemaRule::builtin(name)?;
            debug!(rule = %rule.name, "schema rule enabled");
            Ok(ValidationSession::new().with_schema(rule))
        }
        None => Ok(ValidationSession::new()),
    }
}

/// Turn found errors into a failed run when asked to
pub fn check_failure(errors: usize, args: &ValidationArgs, config: &Config) -> Result<()> {
    let fail_on_errors = args.fail_on_errors || config.validation.fail_on_errors;
    if fail_on_errors && errors > 0 {
        Err(Error::ValidationFailed { errors })
    } else {
        Ok(())
    }
}
