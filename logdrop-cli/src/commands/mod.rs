//! Command handlers -- one module per subcommand

pub mod classify;
pub mod config;
pub mod handle;
pub mod process;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use logdrop_core::config::LogdropConfig;
use logdrop_pipeline::schema::ensure_all_indices;
use logdrop_pipeline::sink::{JsonLinesIndexSink, TracingAlertSink};
use logdrop_pipeline::source::LocalObjectSource;
use logdrop_pipeline::{BatchReport, LogProcessor, LogProcessorBuilder, ProcessorConfig};

use crate::error::CliError;
use crate::output::Render;

/// Processor wired to the local adapters configured under `[storage]`.
pub type LocalProcessor = LogProcessor<LocalObjectSource, JsonLinesIndexSink, TracingAlertSink>;

/// Build a processor over the local adapters and make sure the indices exist.
pub async fn local_processor(config: &LogdropConfig) -> Result<LocalProcessor, CliError> {
    let processor_config = ProcessorConfig::from_core(config)?;

    let index_sink = Arc::new(JsonLinesIndexSink::new(&config.storage.index_dir));
    ensure_all_indices(index_sink.as_ref(), &processor_config.indices)
        .await
        .map_err(|e| CliError::Command(format!("index setup failed: {e}")))?;

    let mut alert_sink = TracingAlertSink::new();
    if !config.storage.alert_log_path.is_empty() {
        alert_sink = alert_sink.with_file(PathBuf::from(&config.storage.alert_log_path));
    }

    let processor = LogProcessorBuilder::new()
        .config(processor_config)
        .source(Arc::new(LocalObjectSource::new(&config.storage.object_root)))
        .index_sink(index_sink)
        .alert_sink(Arc::new(alert_sink))
        .build()?;
    Ok(processor)
}

/// Result of one invocation, shared by `handle` and `process`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationReport {
    pub status_code: u16,
    pub message: String,
    pub lines_processed: usize,
    pub bucket: String,
    pub key: String,
    pub batch: BatchReport,
}

impl Render for InvocationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{} {}/{}", self.message.green().bold(), self.bucket, self.key)?;
        writeln!(w, "  Family:           {}", self.batch.family)?;
        writeln!(w, "  Index:            {}", self.batch.index)?;
        writeln!(w, "  Lines:            {}", self.lines_processed)?;
        writeln!(w, "  Parsed:           {}", self.batch.parsed)?;
        writeln!(w, "  Rejected:         {}", self.batch.rejected)?;
        if self.batch.index_failures > 0 {
            writeln!(
                w,
                "  Index failures:   {}",
                self.batch.index_failures.to_string().red()
            )?;
        } else {
            writeln!(w, "  Index failures:   0")?;
        }
        writeln!(w, "  Alerts published: {}", self.batch.alerts_published)?;
        if self.batch.alert_failures > 0 {
            writeln!(
                w,
                "  Alert failures:   {}",
                self.batch.alert_failures.to_string().red()
            )?;
        }
        Ok(())
    }
}

impl InvocationReport {
    pub fn new(bucket: &str, key: &str, batch: BatchReport) -> Self {
        let outcome = logdrop_core::event::ProcessOutcome::success(batch.lines);
        Self {
            status_code: outcome.status_code,
            message: outcome.message,
            lines_processed: outcome.lines_processed,
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logdrop_core::types::LogFamily;
    use logdrop_pipeline::{Dispatch, IndexNames};

    #[test]
    fn invocation_report_json_uses_camel_case() {
        let names = IndexNames::default();
        let batch = BatchReport::new(Dispatch {
            family: LogFamily::Error,
            index: names.for_family(LogFamily::Error),
        });
        let report = InvocationReport::new("logs", "error/app.log", batch);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["message"], "Logs processed successfully");
        assert_eq!(json["linesProcessed"], 0);
        assert_eq!(json["batch"]["index"], "error-logs");
    }

    #[test]
    fn invocation_report_text() {
        let batch = BatchReport::new(Dispatch {
            family: LogFamily::StandardAccess,
            index: "access-logs",
        });
        let report = InvocationReport::new("logs", "access/a.log", batch);
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("logs/access/a.log"));
        assert!(output.contains("access-logs"));
    }

    #[tokio::test]
    async fn local_processor_creates_index_mappings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = LogdropConfig::default();
        config.storage.index_dir = dir.path().join("indices").display().to_string();
        config.storage.object_root = dir.path().join("objects").display().to_string();

        local_processor(&config).await.expect("processor");
        for index in config.indices.all() {
            assert!(
                dir.path()
                    .join("indices")
                    .join(format!("{index}.mapping.json"))
                    .exists()
            );
        }
    }
}
