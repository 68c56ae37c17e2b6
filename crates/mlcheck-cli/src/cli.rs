//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use mlcheck_core::Dialect;
use std::path::PathBuf;

/// mlcheck - HTML and XML structural validator
///
/// Checks that every element is closed in the right order, knows about HTML
/// void and raw-content elements, and can apply required-structure rules to
/// Moodle XML quiz exports.
#[derive(Parser, Debug)]
#[command(
    name = "mlcheck",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    after_long_help = EXAMPLES
)]
pub struct Cli {
    /// Enable verbose logging (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MLCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Force colored output
    #[arg(long, global = true, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

const EXAMPLES: &str = "EXAMPLES:
  Validate a single file:
    mlcheck check file.html

  Validate a Moodle XML file with statistics:
    mlcheck check file.xml --stat --schema moodlemc

  Scan all HTML files in the current directory:
    mlcheck scan . --all h --stat

  Recursively scan all XML files in the 'projects' directory:
    mlcheck scan ./projects --all x -r --stat";

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single HTML or XML file
    Check(CheckArgs),

    /// Check every HTML or XML file in a directory
    Scan(ScanArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Options shared by `check` and `scan`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ValidationArgs {
    /// Force validation as a specific type (overrides detection)
    #[arg(long, value_enum, ignore_case = true)]
    pub informat: Option<InputFormat>,

    /// Apply a schema rule to XML documents (e.g. "moodlemc")
    #[arg(long, visible_alias = "format", value_name = "RULE")]
    pub schema: Option<String>,

    /// Show statistics (tag count, error count, summaries)
    #[arg(long)]
    pub stat: bool,

    /// Exit with a non-zero code when any error is found
    #[arg(long)]
    pub fail_on_errors: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the input file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub validation: ValidationArgs,
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Which files to scan: "h" (HTML) or "x" (XML)
    #[arg(long = "all", value_enum, ignore_case = true, value_name = "TYPE")]
    pub kind: ScanKind,

    /// Scan subdirectories too
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub validation: ValidationArgs,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to ./.mlcheck.toml)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Document type selected with `--informat`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Html,
    Xml,
}

/// File type selected with `--all`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScanKind {
    /// HTML files (.html, .htm)
    #[value(name = "h", alias = "html")]
    Html,
    /// XML files (.xml)
    #[value(name = "x", alias = "xml")]
    Xml,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    ///
    /// `--color` and `--no-color` win; otherwise the configured setting
    /// applies, and only when stdout is a terminal.
    pub fn use_color(&self, config: &Config) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            config.output.color && std::io::stdout().is_terminal()
        }
    }

    /// Output format from the flag, falling back to the configuration
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.output.unwrap_or(config.output.format)
    }
}

impl From<InputFormat> for Dialect {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Html => Dialect::Html,
            InputFormat::Xml => Dialect::Xml,
        }
    }
}

impl From<ScanKind> for Dialect {
    fn from(kind: ScanKind) -> Self {
        match kind {
            ScanKind::Html => Dialect::Html,
            ScanKind::Xml => Dialect::Xml,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
