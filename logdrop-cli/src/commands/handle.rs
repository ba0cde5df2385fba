//! `logdrop handle` command handler

use std::io::Read;
use std::path::Path;

use tracing::info;

use logdrop_core::config::LogdropConfig;

use crate::cli::HandleArgs;
use crate::commands::{InvocationReport, local_processor};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `handle` command.
///
/// Reads a storage notification, processes the object it names and renders
/// the invocation report. An upstream failure publishes one ERROR alert and
/// exits with the processing error code.
pub async fn execute(
    args: HandleArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = LogdropConfig::load_or_default(config_path).await?;
    let raw = read_event(&args.event).await?;

    let processor = local_processor(&config).await?;
    let event = processor.decode_event(&raw).await?;
    info!(bucket = %event.bucket, key = %event.key, "handling storage notification");

    let batch = processor.handle_report(&event).await?;
    writer.render(&InvocationReport::new(&event.bucket, &event.key, batch))?;
    Ok(())
}

/// Read the notification JSON from a file or, for `-`, from stdin.
async fn read_event(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }

    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::Command(format!("event file not found: {}", path.display()))
        } else {
            CliError::Io(e)
        }
    })
}
