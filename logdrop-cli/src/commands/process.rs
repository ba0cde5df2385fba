//! `logdrop process` command handler

use std::path::Path;

use tracing::info;

use logdrop_core::config::LogdropConfig;
use logdrop_core::event::ObjectEvent;

use crate::cli::ProcessArgs;
use crate::commands::{InvocationReport, local_processor};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `process` command.
///
/// The object is read from `<storage.object_root>/<bucket>/<key>`.
pub async fn execute(
    args: ProcessArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = LogdropConfig::load_or_default(config_path).await?;
    let processor = local_processor(&config).await?;

    info!(bucket = %args.bucket, key = %args.key, "processing object");
    let event = ObjectEvent::new(args.bucket, args.key);
    let batch = processor.handle_report(&event).await?;

    writer.render(&InvocationReport::new(&event.bucket, &event.key, batch))?;
    Ok(())
}
