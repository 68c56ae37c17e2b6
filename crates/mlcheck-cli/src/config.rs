//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON, chosen by extension)
//! - Command-line arguments, which override whatever the file says

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use mlcheck_core::Dialect;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the working directory, in order of preference
const PROJECT_CONFIG_NAMES: &[&str] = &[".mlcheck.toml", ".mlcheck.yaml", ".mlcheck.json"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Directory scan settings
    pub scan: ScanConfig,

    /// Validation settings
    pub validation: ValidationConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output when stdout is a terminal
    pub color: bool,

    /// Show a progress bar during scans with machine-readable output
    pub progress: bool,
}

/// Directory scan configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Descend into subdirectories without `-r`
    pub recursive: bool,

    /// Extensions scanned with `--all h`
    pub html_extensions: Vec<String>,

    /// Extensions scanned with `--all x`
    pub xml_extensions: Vec<String>,
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Schema rule applied when `--schema` is not given
    pub schema: Option<String>,

    /// Treat found errors as a failed run
    pub fail_on_errors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: false,
            progress: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        let owned = |d: Dialect| -> Vec<String> { d.extensions().iter().map(|e| e.to_string()).collect() };
        Self {
            recursive: false,
            html_extensions: owned(Dialect::Html),
            xml_extensions: owned(Dialect::Xml),
        }
    }
}

impl ScanConfig {
    /// Extensions to scan for the given dialect
    pub fn extensions_for(&self, dialect: Dialect) -> &[String] {
        match dialect {
            Dialect::Html => &self.html_extensions,
            Dialect::Xml => &self.xml_extensions,
        }
    }
}

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let config = match FileFormat::for_path(path) {
            FileFormat::Toml => toml::from_str(&content)?,
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable configuration");
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = PROJECT_CONFIG_NAMES.iter().map(PathBuf::from).collect();

        if let Some(config_dir) = dirs::config_dir() {
            let mlcheck_dir = config_dir.join("mlcheck");
            paths.push(mlcheck_dir.join("config.toml"));
            paths.push(mlcheck_dir.join("config.yaml"));
            paths.push(mlcheck_dir.join("config.json"));
        }

        paths
    }

    /// Where `config init` writes by default
    pub fn default_init_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_NAMES[0])
    }

    /// Render in TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file, in the format its extension names
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match FileFormat::for_path(path) {
            FileFormat::Toml => self.to_toml()?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, OutputFormat::Human);
        assert!(!config.output.color);
        assert_eq!(config.scan.extensions_for(Dialect::Html), ["html", "htm"]);
        assert_eq!(config.scan.extensions_for(Dialect::Xml), ["xml"]);
        assert_eq!(config.validation.schema, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".mlcheck.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"json-pretty\"\n\n[validation]\nschema = \"moodlemc\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert!(config.output.progress);
        assert_eq!(config.validation.schema.as_deref(), Some("moodlemc"));
        assert_eq!(config.scan, ScanConfig::default());
    }

    #[test]
    fn test_yaml_and_json_by_extension() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("config.yml");
        std::fs::write(&yaml, "scan:\n  recursive: true\n  html_extensions: [xhtml]\n").unwrap();
        let config = Config::from_file(&yaml).unwrap();
        assert!(config.scan.recursive);
        assert_eq!(config.scan.html_extensions, vec!["xhtml".to_string()]);

        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"validation": {"fail_on_errors": true}}"#).unwrap();
        assert!(Config::from_file(&json).unwrap().validation.fail_on_errors);
    }

    #[test]
    fn test_save_then_load_each_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.format = OutputFormat::Yaml;
        config.validation.schema = Some("moodlemc".to_string());

        for name in ["out.toml", "out.yaml", "nested/out.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config, "{}", name);
        }
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[output\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(Error::TomlDe(_))));
        assert!(matches!(
            Config::load_with_file(Some(&dir.path().join("missing.toml"))),
            Err(Error::Config(_))
        ));
    }
}
