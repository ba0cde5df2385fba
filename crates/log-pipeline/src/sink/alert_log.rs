//! 로그 기반 알림 싱크
//!
//! 알림을 tracing 이벤트로 남기고, 경로가 설정되면 JSON Lines 파일에도 추가합니다.

use std::path::{Path, PathBuf};

use logdrop_core::error::SinkError;
use logdrop_core::pipeline::AlertSink;
use logdrop_core::types::{Alert, Severity};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// tracing + 선택적 파일 알림 싱크
#[derive(Debug, Default)]
pub struct TracingAlertSink {
    file: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl TracingAlertSink {
    /// 로그 전용 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 알림을 JSON Lines로 추가할 파일을 지정합니다.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// 알림 파일 경로
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    async fn append(&self, path: &Path, alert: &Alert) -> Result<(), SinkError> {
        let mut line =
            serde_json::to_vec(alert).map_err(|e| SinkError::Alert(e.to_string()))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SinkError::Alert(e.to_string()))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| SinkError::Alert(format!("{}: {e}", path.display())))?;
        file.write_all(&line)
            .await
            .map_err(|e| SinkError::Alert(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| SinkError::Alert(e.to_string()))
    }
}

impl AlertSink for TracingAlertSink {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn publish(&self, alert: &Alert) -> Result<(), SinkError> {
        match alert.severity {
            Severity::Critical | Severity::Error => tracing::error!(
                alert_id = %alert.id,
                severity = alert.severity.as_label(),
                message = %alert.message,
                "alert"
            ),
            Severity::Warning => tracing::warn!(
                alert_id = %alert.id,
                severity = alert.severity.as_label(),
                message = %alert.message,
                "alert"
            ),
            Severity::Info => tracing::info!(
                alert_id = %alert.id,
                severity = alert.severity.as_label(),
                message = %alert.message,
                "alert"
            ),
        }

        match &self.file {
            Some(path) => self.append(path, alert).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_file_succeeds() {
        let sink = TracingAlertSink::new();
        assert!(sink.file().is_none());
        sink.publish(&Alert::new(Severity::Warning, "5xx"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn publish_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts/alerts.jsonl");
        let sink = TracingAlertSink::new().with_file(&path);

        sink.publish(&Alert::new(Severity::Critical, "Critical Error Detected: fatal"))
            .await
            .unwrap();
        sink.publish(&Alert::new(Severity::Warning, "High number of 5xx errors detected for a"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let alerts: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0]["severity"], "CRITICAL");
        assert_eq!(alerts[1]["severity"], "WARNING");
        assert!(alerts[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unwritable_file_is_alert_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TracingAlertSink::new().with_file(dir.path());
        let err = sink
            .publish(&Alert::new(Severity::Error, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Alert(_)));
    }
}
