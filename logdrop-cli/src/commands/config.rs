//! `logdrop config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logdrop_core::config::LogdropConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Section names accepted by `config show --section`.
const SECTIONS: [&str; 4] = ["general", "processor", "indices", "storage"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// The file must exist. Environment overrides are applied before validation,
/// so the report reflects what `handle` and `process` would run with.
///
/// # Errors
///
/// Returns `CliError::Config` if the file is missing, malformed or holds an
/// invalid value.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match LogdropConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration: defaults, then the file if present,
/// then environment overrides.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = LogdropConfig::load_or_default(config_path).await?;
    let report = build_show_report(&config, config_path, section)?;

    writer.render(&report)?;
    Ok(())
}

fn build_show_report(
    config: &LogdropConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section.as_deref() {
        None => to_toml(config),
        Some("general") => to_toml(&config.general),
        Some("processor") => to_toml(&config.processor),
        Some("indices") => to_toml(&config.indices),
        Some("storage") => to_toml(&config.storage),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {})",
                SECTIONS.join(", ")
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    })
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {e})"))
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{section}]");
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Debug, Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
