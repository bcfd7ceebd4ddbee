//! Command-line argument definitions for the JRDB parser
//!
//! This module defines the CLI interface using the clap derive API. Each
//! subcommand owns its argument struct; logging flags are shared.

use crate::config::ParserConfig;
use crate::constants::{ENV_EXTENSION, ENV_OUTPUT_DIR, ENV_WORKERS};
use crate::{JrdbError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the JRDB feed parser
///
/// Decodes fixed-width JRDB horse-racing feed files into flat records ready
/// for a warehouse load.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jrdb-parser",
    version,
    about = "Decode fixed-width JRDB horse-racing feeds into warehouse-ready records",
    long_about = "Decodes JRDB fixed-width feed files (race programs, entries, results, \
                  horse master, extended stats and meeting conditions) into flat records. \
                  Files are routed to their target table by the three-letter format tag in \
                  the file name and written as newline-delimited JSON together with a \
                  manifest of merge keys."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a single feed file and print its records as NDJSON
    Parse(ParseArgs),
    /// Process every feed file under a directory into per-table output
    Process(ProcessArgs),
    /// Parse a file and run the data quality checks for its table
    Check(CheckArgs),
    /// List the supported format tags and their target tables
    Formats(FormatsArgs),
}

/// Logging flags shared by every command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoggingArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LoggingArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Feed file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Format tag to use instead of the one in the file name
    ///
    /// Needed when the file does not follow the `<TAG><YYMMDD>.<ext>` naming
    /// convention, for example `--format SED`.
    #[arg(
        short = 'f',
        long = "format",
        value_name = "TAG",
        help = "Format tag (defaults to the tag in the file name)"
    )]
    pub format: Option<String>,

    /// Write records to this file instead of stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file for NDJSON records (default: stdout)"
    )]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the process command (batch load)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Directory searched recursively for feed files
    #[arg(
        short = 'i',
        long = "input",
        value_name = "DIR",
        help = "Directory containing JRDB feed files"
    )]
    pub input: PathBuf,

    /// Root directory for per-table NDJSON output and the manifest
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        env = ENV_OUTPUT_DIR,
        help = "Output directory for per-table records"
    )]
    pub output: Option<PathBuf>,

    /// Number of files processed concurrently
    ///
    /// Defaults to the number of logical CPUs.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        env = ENV_WORKERS,
        help = "Number of parallel workers"
    )]
    pub workers: Option<usize>,

    /// Extension of feed files, without the dot
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "EXT",
        env = ENV_EXTENSION,
        help = "Feed file extension (default: csv)"
    )]
    pub extension: Option<String>,

    /// Path to a JSON configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Treat files that yield no records as failures
    #[arg(long = "fail-on-empty", help = "Count files with no records as failures")]
    pub fail_on_empty: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Feed file to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Format tag to use instead of the one in the file name
    #[arg(
        short = 'f',
        long = "format",
        value_name = "TAG",
        help = "Format tag (defaults to the tag in the file name)"
    )]
    pub format: Option<String>,

    /// Minimum share of data lines that must decode, in percent
    #[arg(
        long = "min-success-rate",
        value_name = "PERCENT",
        help = "Minimum parse success rate (default: 90)"
    )]
    pub min_success_rate: Option<f64>,

    /// Rows the file must yield before the row count check passes
    #[arg(
        long = "min-rows",
        value_name = "ROWS",
        default_value_t = crate::app::services::quality_check::DEFAULT_MIN_ROWS,
        help = "Minimum expected row count"
    )]
    pub min_rows: usize,

    /// Output format for the quality report
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the formats command
#[derive(Debug, Clone, Parser)]
pub struct FormatsArgs {
    /// Output format for the listing
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// Get the command to execute, defaulting to the format listing
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Formats(FormatsArgs {
            output_format: OutputFormat::Human,
        }))
    }
}

impl ParseArgs {
    pub fn validate(&self) -> Result<()> {
        validate_input_file(&self.file)?;

        if let Some(output) = &self.output {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    return Err(JrdbError::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(JrdbError::configuration(format!(
                "Input path does not exist: {}",
                self.input.display()
            )));
        }
        if !self.input.is_dir() {
            return Err(JrdbError::configuration(format!(
                "Input path is not a directory: {}",
                self.input.display()
            )));
        }
        if self.workers == Some(0) {
            return Err(JrdbError::configuration(
                "Number of workers must be greater than 0",
            ));
        }
        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(JrdbError::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Layered configuration: file, environment, then these flags
    pub fn build_config(&self) -> Result<ParserConfig> {
        let mut config = ParserConfig::load(self.config_file.as_deref())?;

        if let Some(output) = &self.output {
            config = config.with_output_dir(output.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(extension) = &self.extension {
            config = config.with_extension(extension.clone());
        }
        if self.fail_on_empty {
            config = config.with_fail_on_empty(true);
        }

        config.validate()?;
        Ok(config)
    }
}

impl CheckArgs {
    pub fn validate(&self) -> Result<()> {
        validate_input_file(&self.file)?;

        if let Some(rate) = self.min_success_rate {
            if !(0.0..=100.0).contains(&rate) {
                return Err(JrdbError::configuration(format!(
                    "Minimum success rate must be between 0 and 100, got {}",
                    rate
                )));
            }
        }
        Ok(())
    }
}

fn validate_input_file(file: &std::path::Path) -> Result<()> {
    if !file.is_file() {
        return Err(JrdbError::configuration(format!(
            "Input file does not exist: {}",
            file.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_log_levels() {
        let mut logging = LoggingArgs::default();
        assert_eq!(logging.get_log_level(), "warn");
        logging.verbose = 2;
        assert_eq!(logging.get_log_level(), "debug");
        logging.verbose = 5;
        assert_eq!(logging.get_log_level(), "trace");
        logging.quiet = true;
        assert_eq!(logging.get_log_level(), "error");
        assert!(!logging.show_progress());
    }

    #[test]
    fn test_parse_subcommand() {
        let args = Args::try_parse_from([
            "jrdb-parser",
            "parse",
            "SED260104.csv",
            "--format",
            "sed",
            "-vv",
        ])
        .unwrap();

        match args.get_command() {
            Commands::Parse(parse) => {
                assert_eq!(parse.file, PathBuf::from("SED260104.csv"));
                assert_eq!(parse.format.as_deref(), Some("sed"));
                assert!(parse.output.is_none());
                assert_eq!(parse.logging.verbose, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_process_flags() {
        let args = Args::try_parse_from([
            "jrdb-parser",
            "process",
            "--input",
            "feeds",
            "--output",
            "out",
            "-j",
            "4",
            "--extension",
            "txt",
            "--fail-on-empty",
            "--output-format",
            "json",
        ])
        .unwrap();

        let Commands::Process(process) = args.get_command() else {
            panic!("expected process command");
        };
        assert_eq!(process.input, PathBuf::from("feeds"));
        assert_eq!(process.output, Some(PathBuf::from("out")));
        assert_eq!(process.workers, Some(4));
        assert_eq!(process.extension.as_deref(), Some("txt"));
        assert!(process.fail_on_empty);
        assert_eq!(process.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_check_min_rows() {
        let args = Args::try_parse_from(["jrdb-parser", "check", "a.csv"]).unwrap();
        let Commands::Check(check) = args.get_command() else {
            panic!("expected check command");
        };
        assert_eq!(check.min_rows, 1);

        let args =
            Args::try_parse_from(["jrdb-parser", "check", "a.csv", "--min-rows", "1000"]).unwrap();
        let Commands::Check(check) = args.get_command() else {
            panic!("expected check command");
        };
        assert_eq!(check.min_rows, 1000);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["jrdb-parser", "check", "a.csv", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_command_lists_formats() {
        let args = Args::try_parse_from(["jrdb-parser"]).unwrap();
        assert!(matches!(args.get_command(), Commands::Formats(_)));
    }

    #[test]
    fn test_validation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("BAA260104.csv");
        std::fs::write(&file, "").unwrap();

        let check = CheckArgs {
            file: file.clone(),
            format: None,
            min_success_rate: Some(150.0),
            min_rows: 1,
            output_format: OutputFormat::Human,
            logging: LoggingArgs::default(),
        };
        assert!(check.validate().is_err());

        let parse = ParseArgs {
            file: dir.path().join("missing.csv"),
            format: None,
            output: None,
            logging: LoggingArgs::default(),
        };
        assert!(parse.validate().is_err());

        let process = ProcessArgs {
            input: file,
            output: None,
            workers: None,
            extension: None,
            config_file: None,
            fail_on_empty: false,
            output_format: OutputFormat::Human,
            logging: LoggingArgs::default(),
        };
        assert!(matches!(
            process.validate(),
            Err(JrdbError::Configuration { .. })
        ));
    }

    #[test]
    fn test_flags_override_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("jrdb.json");
        std::fs::write(&config_file, r#"{"workers": 2, "extension": "dat"}"#).unwrap();

        let process = ProcessArgs {
            input: dir.path().to_path_buf(),
            output: Some(dir.path().join("out")),
            workers: Some(3),
            extension: None,
            config_file: Some(config_file),
            fail_on_empty: true,
            output_format: OutputFormat::Human,
            logging: LoggingArgs::default(),
        };
        assert!(process.validate().is_ok());

        let config = process.build_config().unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.output_dir, dir.path().join("out"));
        assert!(config.fail_on_empty);
    }
}
