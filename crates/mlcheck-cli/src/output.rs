//! Output formatting and writing utilities
//!
//! Human output mirrors the classic mlcheck report layout line for line;
//! machine formats (JSON, YAML) serialize the core report structures.
//! Colors go through a [`Decorator`], so rendering functions stay pure and
//! testable with [`Plain`].

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mlcheck_core::{
    BatchSummary, Dialect, Diagnostic, DirectoryReport, DocumentReport, FileOutcome,
};
use serde::Serialize;
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;
use tracing::trace;

const SUMMARY_RULE: &str = "=================================================";

/// Styling capability for human output
pub trait Decorator {
    /// Diagnostics and failures
    fn error(&self, text: &str) -> String;
    /// Clean results
    fn success(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    /// Format and encoding names in statistics headers
    fn highlight(&self, text: &str) -> String;
    fn path(&self, text: &str) -> String;

    /// A count that is bad news when non-zero
    fn error_count(&self, count: usize) -> String {
        if count > 0 {
            self.error(&count.to_string())
        } else {
            self.success(&count.to_string())
        }
    }
}

/// Terminal colors through `colored`
#[derive(Debug, Clone, Copy, Default)]
pub struct Colored;

/// No styling at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Decorator for Colored {
    fn error(&self, text: &str) -> String {
        text.red().to_string()
    }

    fn success(&self, text: &str) -> String {
        text.green().to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.yellow().to_string()
    }

    fn highlight(&self, text: &str) -> String {
        text.cyan().to_string()
    }

    fn path(&self, text: &str) -> String {
        text.yellow().to_string()
    }
}

impl Decorator for Plain {
    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn highlight(&self, text: &str) -> String {
        text.to_string()
    }

    fn path(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Trait for formatting results in the selected output format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the result of a single-file check
    fn format_document(
        &self,
        report: &DocumentReport,
        stat: bool,
        decorator: &dyn Decorator,
    ) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(serde_json::to_string_pretty(value)?)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_document(
        &self,
        report: &DocumentReport,
        stat: bool,
        decorator: &dyn Decorator,
    ) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(render_document(report, stat, decorator)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    show_progress: bool,
    quiet: bool,
    decorator: Box<dyn Decorator>,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            show_progress: progress && !quiet && io::stdout().is_terminal(),
            quiet,
            decorator: decorator_for(use_color),
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            // No progress bars with custom writers
            show_progress: false,
            quiet,
            decorator: decorator_for(use_color),
            writer,
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn decorator(&self) -> &dyn Decorator {
        self.decorator.as_ref()
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an informational line (suppressed in quiet mode)
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        self.writeln(message)
    }

    /// Write a warning line
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        let line = self.decorator.warning(&format!("Warning: {}", message));
        self.writeln(&line)
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "writing structured output");
        self.writeln(formatted.trim_end())
    }

    /// Write the result of a single-file check
    pub fn document(&mut self, report: &DocumentReport, stat: bool) -> Result<()> {
        let formatted = self
            .format
            .format_document(report, stat, self.decorator.as_ref())?;
        self.writeln(formatted.trim_end())
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress || length == 0 {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }
}

fn decorator_for(use_color: bool) -> Box<dyn Decorator> {
    if use_color {
        Box::new(Colored)
    } else {
        Box::new(Plain)
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// One diagnostic as a report line
pub fn render_diagnostic(diagnostic: &Diagnostic, decorator: &dyn Decorator) -> String {
    decorator.error(&diagnostic.to_string())
}

fn render_diagnostics(diagnostics: &[Diagnostic], decorator: &dyn Decorator, out: &mut String) {
    for diagnostic in diagnostics {
        out.push_str(&render_diagnostic(diagnostic, decorator));
        out.push('\n');
    }
}

/// Single-file report: diagnostics or the clean message, then statistics
pub fn render_document(report: &DocumentReport, stat: bool, decorator: &dyn Decorator) -> String {
    let outcome = &report.outcome;
    let mut out = String::new();

    if outcome.diagnostics.is_empty() {
        out.push_str(&decorator.success("No errors found. File is valid."));
        out.push('\n');
    } else {
        out.push_str("--- Errors Found ---\n");
        render_diagnostics(&outcome.diagnostics, decorator, &mut out);
    }

    if stat {
        out.push_str(&format!(
            "\n--- Statistics (Format: {}, Encoding: {}) ---\n",
            decorator.highlight(outcome.dialect.as_str()),
            decorator.highlight(report.encoding.as_str()),
        ));
        out.push_str(&format!(
            "Total tags (approx.): {}, Total errors: {}\n",
            outcome.stats.tag_or_node_count, outcome.stats.error_count
        ));
    }

    out
}

/// Batch report for one file; clean files print nothing
pub fn render_batch_file(outcome: &FileOutcome, decorator: &dyn Decorator) -> Option<String> {
    match outcome {
        FileOutcome::Checked(report) if report.outcome.diagnostics.is_empty() => None,
        FileOutcome::Checked(report) => {
            let mut out = format!(
                "\n--- Errors Found in: {} ---\n",
                decorator.path(&report.path.display().to_string())
            );
            render_diagnostics(&report.outcome.diagnostics, decorator, &mut out);
            Some(out)
        }
        FileOutcome::Failed { message, .. } => Some(format!("{}\n", decorator.error(message))),
    }
}

pub fn render_scan_banner(dialect: Dialect, root: &Path, recursive: bool) -> String {
    format!(
        "Starting scan for {} files in '{}' (Recursive: {})...\n",
        dialect,
        root.display(),
        recursive
    )
}

pub fn render_directory_header(directory: &Path, decorator: &dyn Decorator) -> String {
    format!(
        "--- Scanning Directory: {} ---",
        decorator.highlight(&directory.display().to_string())
    )
}

pub fn render_directory_summary(report: &DirectoryReport, decorator: &dyn Decorator) -> String {
    let summary = &report.summary;
    format!(
        "--- Directory Summary ({}):\n  Files Scanned: {}\n  Files with Errors: {}\n  Total Errors Found: {}\n",
        report.directory.display(),
        summary.files_scanned,
        decorator.error_count(summary.files_with_errors),
        summary.total_errors,
    )
}

pub fn render_global_summary(summary: &BatchSummary, decorator: &dyn Decorator) -> String {
    format!(
        "\n{rule}\n--- {title} ---\nTotal Files Scanned:       {}\nTotal Tags Found:          {}\nTotal Files with Errors:   {}\nTotal Errors Found:        {}\n{rule}",
        summary.files_scanned,
        summary.total_tags,
        decorator.error_count(summary.files_with_errors),
        summary.total_errors,
        rule = SUMMARY_RULE,
        title = decorator.success("GLOBAL SCAN SUMMARY"),
    )
}
