//! CLI-specific error types and exit code mapping

use logdrop_core::error::LogdropError;
use logdrop_pipeline::LogPipelineError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The invocation failed upstream (event, fetch, decompression).
    #[error("processing failed: {0}")]
    Processing(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logdrop-core.
    #[error("{0}")]
    Core(#[from] LogdropError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                     |
    /// |------|-----------------------------|
    /// | 0    | Success                     |
    /// | 1    | General / command error     |
    /// | 2    | Configuration error         |
    /// | 3    | Processing failure          |
    /// | 10   | IO error                    |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LogdropError::Config(_)) => 2,
            Self::Processing(_) => 3,
            Self::Io(_) | Self::Core(LogdropError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<LogPipelineError> for CliError {
    fn from(e: LogPipelineError) -> Self {
        match e {
            LogPipelineError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Processing(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logdrop_core::error::{ConfigError, SourceError};

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err = CliError::Core(LogdropError::Config(ConfigError::FileNotFound {
            path: "logdrop.toml".to_owned(),
        }));
        assert_eq!(err.exit_code(), 2, "core config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_processing_error() {
        let err: CliError = LogPipelineError::Source(SourceError::NotFound {
            bucket: "logs".to_owned(),
            key: "a.log".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 3, "processing error should return exit code 3");
        assert!(err.to_string().contains("object not found: logs/a.log"));
    }

    #[test]
    fn test_exit_code_pipeline_config_error() {
        let err: CliError = LogPipelineError::Config {
            field: "server_error_threshold".to_owned(),
            reason: "out of range".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");

        let core_io = CliError::Core(LogdropError::Io(std::io::Error::other("disk")));
        assert_eq!(core_io.exit_code(), 10);
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1, "command error should return exit code 1");
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        let err = CliError::JsonSerialize(json_err);
        assert_eq!(err.exit_code(), 1, "json serialize error should return exit code 1");
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }
}
