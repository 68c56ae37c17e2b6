//! Directory scan command handler

use super::utils;
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{self, OutputWriter};
use indicatif::ProgressBar;
use mlcheck_core::{BatchEvent, BatchScan, Dialect, Discovery};
use tracing::{info, instrument};

/// Handle the scan command
#[instrument(skip(args, config, output), fields(directory = %args.directory.display(), kind = ?args.kind))]
pub fn handle_scan(args: ScanArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("scan_command", &format!("directory: {}", args.directory.display()));

    utils::ensure_exists(&args.directory)?;
    if !args.directory.is_dir() {
        return Err(Error::invalid_args(format!(
            "Scanning requires a directory, but {} is a file. Use 'mlcheck check' for single files.",
            args.directory.display()
        )));
    }

    let dialect = Dialect::from(args.kind);
    let recursive = args.recursive || config.scan.recursive;
    let discovery = Discovery::new(config.scan.extensions_for(dialect)).recursive(recursive);

    let scan = BatchScan::new(utils::build_session(&args.validation, config)?, dialect)
        .with_discovery(discovery)
        .force_dialect(args.validation.informat.map(Dialect::from));

    output.info(&output::render_scan_banner(dialect, &args.directory, recursive))?;

    let mut printer = ScanPrinter {
        output: &mut *output,
        progress: None,
        stat: args.validation.stat,
        recursive,
        failure: None,
    };
    let report = scan.run_with_progress(&args.directory, |event| printer.handle(event))?;
    printer.finish()?;

    if output.is_human() {
        if report.summary.is_empty() {
            if !recursive {
                output.writeln("No matching files found in this directory.")?;
            }
            output.writeln("No matching files found to scan.")?;
        } else if args.validation.stat {
            let summary = output::render_global_summary(&report.summary, output.decorator());
            output.writeln(&summary)?;
        }
    } else {
        output.data(&report)?;
    }

    info!(
        files = report.summary.files_scanned,
        errors = report.summary.total_errors,
        "scan command finished"
    );

    utils::check_failure(report.summary.total_errors, &args.validation, config)
}

/// Streams human output (or drives the progress bar) while a scan runs
struct ScanPrinter<'a> {
    output: &'a mut OutputWriter,
    progress: Option<ProgressBar>,
    stat: bool,
    recursive: bool,
    /// First write error; the scan itself keeps going
    failure: Option<Error>,
}

impl ScanPrinter<'_> {
    fn handle(&mut self, event: BatchEvent<'_>) {
        if self.failure.is_some() {
            return;
        }
        if let Err(e) = self.render(event) {
            self.failure = Some(e);
        }
    }

    fn render(&mut self, event: BatchEvent<'_>) -> Result<()> {
        let human = self.output.is_human();
        // Directory blocks only make sense when directories are walked
        let directory_blocks = human && self.stat && self.recursive;

        match event {
            BatchEvent::Planned { total_files } => {
                if !human {
                    self.progress = self.output.progress_bar(total_files as u64, "scanning");
                }
            }
            BatchEvent::DirectoryStarted { directory, .. } => {
                if directory_blocks {
                    let header = output::render_directory_header(directory, self.output.decorator());
                    self.output.writeln(&header)?;
                }
            }
            BatchEvent::FileChecked(outcome) => {
                if let Some(pb) = &self.progress {
                    pb.set_message(outcome.path().display().to_string());
                    pb.inc(1);
                }
                if human {
                    if let Some(text) = output::render_batch_file(outcome, self.output.decorator()) {
                        self.output.writeln(text.trim_end())?;
                    }
                }
            }
            BatchEvent::DirectoryFinished(report) => {
                if directory_blocks && report.summary.files_scanned > 0 {
                    let summary = output::render_directory_summary(report, self.output.decorator());
                    self.output.writeln(&summary)?;
                }
            }
        }

        Ok(())
    }

    fn finish(self) -> Result<()> {
        if let Some(pb) = self.progress {
            pb.finish_and_clear();
        }
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
