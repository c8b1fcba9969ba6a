use crate::error::{AggregatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONTENT_REPORT_FILE_NAME: &str = "Aggregate - Content - Table data.csv";
pub const TRAFFIC_SOURCE_REPORT_FILE_NAME: &str = "Aggregate - Traffic source - Table data.csv";

/// Locations searched when no configuration path is given, in order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["config.yaml", "config.yml", "aggregator.toml"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub root_directory: Option<PathBuf>,
    pub reports_directory: Option<PathBuf>,
}

/// Validated directories for one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub root_directory: PathBuf,
    pub reports_directory: PathBuf,
}

impl ReportPaths {
    pub fn new<R: Into<PathBuf>, O: Into<PathBuf>>(root_directory: R, reports_directory: O) -> Self {
        Self {
            root_directory: root_directory.into(),
            reports_directory: reports_directory.into(),
        }
    }

    pub fn content_report_path(&self) -> PathBuf {
        self.reports_directory.join(CONTENT_REPORT_FILE_NAME)
    }

    pub fn traffic_source_report_path(&self) -> PathBuf {
        self.reports_directory.join(TRAFFIC_SOURCE_REPORT_FILE_NAME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AggregatorError::Config {
                message: format!("Configuration file '{}' not found", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AggregatorError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| AggregatorError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?,
            ConfigFormat::Yaml => parse_yaml(&content).map_err(|e| AggregatorError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?,
        };

        Ok(config)
    }

    /// Loads the given file, or the first of [`DEFAULT_CONFIG_PATHS`] that exists.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => match Self::find_default() {
                Some(path) => Self::load_from_file(path),
                None => Err(AggregatorError::Config {
                    message: format!(
                        "Configuration file not found (looked for {})",
                        DEFAULT_CONFIG_PATHS.join(", ")
                    ),
                }),
            },
        }
    }

    pub fn find_default() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref root) = cli_args.root_directory {
            self.root_directory = Some(root.clone());
        }

        if let Some(ref reports) = cli_args.reports_directory {
            self.reports_directory = Some(reports.clone());
        }
    }

    /// Both directories are required; the root must already exist.
    pub fn validate(&self) -> Result<ReportPaths> {
        let root_directory = self
            .root_directory
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| AggregatorError::Config {
                message: "root_directory is not specified".to_string(),
            })?;

        let reports_directory = self
            .reports_directory
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| AggregatorError::Config {
                message: "reports_directory is not specified".to_string(),
            })?;

        if !root_directory.is_dir() {
            return Err(AggregatorError::InvalidPath {
                path: format!("{} is not a directory", root_directory.display()),
            });
        }

        if reports_directory.exists() && !reports_directory.is_dir() {
            return Err(AggregatorError::InvalidPath {
                path: format!("{} is not a directory", reports_directory.display()),
            });
        }

        Ok(ReportPaths::new(root_directory.clone(), reports_directory.clone()))
    }

    pub fn create_sample_config<P: AsRef<Path>>(path: P) -> String {
        let sample = Self {
            root_directory: Some(PathBuf::from("/path/to/video/exports")),
            reports_directory: Some(PathBuf::from("/path/to/reports")),
        };

        match ConfigFormat::from_path(path.as_ref()) {
            ConfigFormat::Toml => toml::to_string_pretty(&sample).unwrap_or_default(),
            ConfigFormat::Yaml => serde_yaml::to_string(&sample).unwrap_or_default(),
        }
    }
}

// An empty YAML document deserializes to unit, not to an empty mapping.
fn parse_yaml(content: &str) -> std::result::Result<Config, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content)
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub root_directory: Option<PathBuf>,
    pub reports_directory: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_directory(mut self, root: Option<PathBuf>) -> Self {
        self.root_directory = root;
        self
    }

    pub fn with_reports_directory(mut self, reports: Option<PathBuf>) -> Self {
        self.reports_directory = reports;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.root_directory.is_some() && self.reports_directory.is_some()
    }
}
