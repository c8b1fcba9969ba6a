use crate::config::{CliOverrides, Config, ReportPaths};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "analytics-aggregator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate per-video analytics exports into consolidated CSV reports")]
#[command(
    long_about = "Scans a folder containing one sub-folder per video, reads the 'Table data' CSV \
                  from each 'Content' and 'Traffic source' zip export, and writes one content \
                  report and one traffic source report with a row per video."
)]
#[command(after_help = "EXAMPLES:\n  \
    analytics-aggregator\n  \
    analytics-aggregator --config exports.yaml\n  \
    analytics-aggregator --root ~/exports --reports ~/reports --dry-run\n  \
    analytics-aggregator --output-format json --quiet")]
pub struct Cli {
    /// Configuration file path (YAML, or TOML with a .toml extension)
    #[arg(short, long, help = "Path to the configuration file (default: config.yaml)")]
    pub config: Option<PathBuf>,

    /// Folder containing one sub-folder per video
    #[arg(short, long, env = "AGGREGATOR_ROOT_DIRECTORY")]
    pub root: Option<PathBuf>,

    /// Folder the aggregate reports are written to
    #[arg(long, env = "AGGREGATOR_REPORTS_DIRECTORY")]
    pub reports: Option<PathBuf>,

    /// Output format for console messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the archives that would be aggregated without writing reports
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    /// Loads, overrides and validates the configuration.
    pub fn load_config(&self) -> Result<ReportPaths> {
        let overrides = self.create_cli_overrides();

        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None if overrides.is_complete() && Config::find_default().is_none() => Config::new(),
            None => Config::load_with_defaults(None::<PathBuf>)?,
        };

        config.merge_with_cli_args(&overrides);
        config.validate()
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_root_directory(self.root.clone())
            .with_reports_directory(self.reports.clone())
    }

    pub fn config_path_for_generation(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("config.yaml"))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AggregatorError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "analytics-aggregator",
            "--config",
            "exports.yaml",
            "--root",
            "/videos",
            "-vv",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("exports.yaml")));
        assert_eq!(cli.root, Some(PathBuf::from("/videos")));
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["analytics-aggregator", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("videos");
        fs::create_dir(&root).unwrap();

        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            format!(
                "root_directory: {}\nreports_directory: {}\n",
                root.display(),
                temp_dir.path().join("reports").display()
            ),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "analytics-aggregator",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let paths = cli.load_config().unwrap();
        assert_eq!(paths.root_directory, root);
        assert_eq!(paths.reports_directory, temp_dir.path().join("reports"));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.yaml");

        let cli = Cli::try_parse_from([
            "analytics-aggregator",
            "--config",
            missing.to_str().unwrap(),
            "--root",
            temp_dir.path().to_str().unwrap(),
            "--reports",
            temp_dir.path().to_str().unwrap(),
        ])
        .unwrap();

        assert!(matches!(cli.load_config(), Err(AggregatorError::Config { .. })));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("aggregator.toml");
        fs::write(
            &config_path,
            "root_directory = \"/does/not/exist\"\nreports_directory = \"/reports\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "analytics-aggregator",
            "--config",
            config_path.to_str().unwrap(),
            "--root",
            temp_dir.path().to_str().unwrap(),
        ])
        .unwrap();

        let paths = cli.load_config().unwrap();
        assert_eq!(paths.root_directory, temp_dir.path());
        assert_eq!(paths.reports_directory, PathBuf::from("/reports"));
    }

    #[test]
    fn test_config_path_for_generation() {
        let cli = Cli::try_parse_from(["analytics-aggregator", "--generate-config"]).unwrap();
        assert_eq!(cli.config_path_for_generation(), PathBuf::from("config.yaml"));
    }
}
