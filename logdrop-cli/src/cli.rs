//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use logdrop_core::types::LogFamily;

/// logdrop -- log object classification and alerting.
///
/// Use `logdrop <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logdrop", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logdrop.toml configuration file.
    #[arg(short, long, global = true, default_value = "logdrop.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process one object from a storage notification JSON file.
    Handle(HandleArgs),

    /// Process one object by bucket and key.
    Process(ProcessArgs),

    /// Classify log lines without indexing or alerting.
    Classify(ClassifyArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- handle ----

/// Run one invocation from a storage notification.
#[derive(Args, Debug)]
pub struct HandleArgs {
    /// Notification JSON file (`-` reads stdin).
    pub event: PathBuf,
}

// ---- process ----

/// Run one invocation for an object under the configured object root.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Bucket name (directory under `storage.object_root`).
    #[arg(long)]
    pub bucket: String,

    /// Object key, already decoded.
    #[arg(long)]
    pub key: String,
}

// ---- classify ----

/// Classify lines from a file or stdin and print the records.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Log family (error, access, apache).
    #[arg(long, value_parser = parse_family)]
    pub family: LogFamily,

    /// Input file (default: stdin).
    pub file: Option<PathBuf>,

    /// Also list rejected lines with their reasons.
    #[arg(long)]
    pub show_rejected: bool,
}

fn parse_family(s: &str) -> Result<LogFamily, String> {
    LogFamily::from_str_loose(s)
        .ok_or_else(|| format!("unknown family '{s}' (expected: error, access, apache)"))
}

// ---- config ----

/// Manage logdrop configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, processor, indices, storage).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_handle() {
        let cli = Cli::try_parse_from(["logdrop", "handle", "event.json"]).expect("parse succeeded");
        match cli.command {
            Commands::Handle(args) => assert_eq!(args.event, PathBuf::from("event.json")),
            _ => panic!("expected Handle command"),
        }
        assert_eq!(cli.config, PathBuf::from("logdrop.toml"));
    }

    #[test]
    fn test_cli_parse_process() {
        let cli = Cli::try_parse_from([
            "logdrop",
            "process",
            "--bucket",
            "logs",
            "--key",
            "wpe_logs/error/app.log.gz",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.bucket, "logs");
                assert_eq!(args.key, "wpe_logs/error/app.log.gz");
            }
            _ => panic!("expected Process command"),
        }
    }

    #[test]
    fn test_cli_process_requires_key() {
        let result = Cli::try_parse_from(["logdrop", "process", "--bucket", "logs"]);
        assert!(result.is_err(), "missing --key should fail");
    }

    #[test]
    fn test_cli_parse_classify_family_aliases() {
        for (alias, family) in [
            ("error", LogFamily::Error),
            ("access", LogFamily::StandardAccess),
            ("apache", LogFamily::ApacheAccess),
        ] {
            let cli = Cli::try_parse_from(["logdrop", "classify", "--family", alias])
                .expect("parse succeeded");
            match cli.command {
                Commands::Classify(args) => {
                    assert_eq!(args.family, family);
                    assert!(args.file.is_none());
                }
                _ => panic!("expected Classify command"),
            }
        }
    }

    #[test]
    fn test_cli_classify_unknown_family() {
        let result = Cli::try_parse_from(["logdrop", "classify", "--family", "syslog"]);
        assert!(result.is_err(), "unknown family should fail");
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["logdrop", "config", "show", "--section", "indices"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => assert_eq!(section.as_deref(), Some("indices")),
                ConfigAction::Validate => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "logdrop",
            "config",
            "validate",
            "--output",
            "json",
            "--log-level",
            "debug",
            "--config",
            "/etc/logdrop.toml",
        ])
        .expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, PathBuf::from("/etc/logdrop.toml"));
    }
}
