//! mlcheck CLI - structural validator for HTML and XML files
//!
//! This is the main entry point for the mlcheck binary, providing commands
//! for checking single files, scanning directories and managing the
//! configuration file.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Run inside a scope so the log file guard is flushed before exiting
    let code = {
        let _log_guard = match init_logging(&cli) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {}", e);
                None
            }
        };

        match run(cli) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

                if e.should_show_help() {
                    eprintln!("\nFor more information, try '--help'");
                }

                e.exit_code()
            }
        }
    };

    process::exit(code);
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
fn run(cli: Cli) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    // Load configuration
    let config = {
        let _config_timer = Timer::new("config_loading");
        tracing::info!("Loading configuration");
        Config::load_with_file(cli.config.as_deref())?
    };

    // Set up colored output
    let use_color = cli.use_color(&config);
    control::set_override(use_color);

    let mut output = OutputWriter::new(
        cli.output_format(&config),
        use_color,
        cli.quiet,
        config.output.progress,
    );

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Check(args) => handlers::handle_check(args, &config, &mut output),
        Commands::Scan(args) => handlers::handle_scan(args, &config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // Create logging configuration from CLI args and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
