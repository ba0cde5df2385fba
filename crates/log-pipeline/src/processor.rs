//! 호출 오케스트레이션 -- 오브젝트 하나를 읽어 분류, 인덱싱, 알림까지 처리합니다.
//!
//! [`LogProcessor`]는 트리거 이벤트 하나를 받아 다음 순서로 처리합니다.
//!
//! ```text
//! event ─> ObjectSource::fetch ─> Decompressor ─> lines ─┬─> classifier ─> IndexSink
//!                                                         └─> AlertEvaluator ─> AlertSink
//! ```
//!
//! - 배치 계열과 인덱스는 오브젝트 키로 한 번 결정됩니다.
//! - 라인은 순서대로 하나씩 끝까지 처리됩니다.
//! - 라인 단위 실패(거부, 인덱싱 실패, 알림 실패)는 배치를 멈추지 않습니다.
//! - 이벤트 해석, 조회, 압축 해제 실패는 호출 전체를 중단하고 `ERROR` 알림을
//!   한 번 발행한 뒤 에러를 반환합니다.
//!
//! # 사용 예시
//! ```ignore
//! use std::sync::Arc;
//! use logdrop_pipeline::{LogProcessorBuilder, ProcessorConfig};
//! use logdrop_pipeline::sink::{JsonLinesIndexSink, TracingAlertSink};
//! use logdrop_pipeline::source::LocalObjectSource;
//!
//! let processor = LogProcessorBuilder::new()
//!     .config(ProcessorConfig::default())
//!     .source(Arc::new(LocalObjectSource::new("./data/objects")))
//!     .index_sink(Arc::new(JsonLinesIndexSink::new("./data/indices")))
//!     .alert_sink(Arc::new(TracingAlertSink::new()))
//!     .build()?;
//!
//! let outcome = processor.handle_event_json(&raw_event).await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::Serialize;

use logdrop_core::error::{SinkError, SourceError};
use logdrop_core::event::{ObjectEvent, ProcessOutcome};
use logdrop_core::metrics as m;
use logdrop_core::pipeline::{AlertSink, Decompressor, IndexSink, ObjectSource};
use logdrop_core::types::{Alert, LogFamily};

use crate::alert::{AlertEvaluator, failure_alert};
use crate::config::ProcessorConfig;
use crate::dispatch::{Dispatch, DispatchPolicy};
use crate::error::LogPipelineError;
use crate::parser::{LogClassifier, ParseOutcome};
use crate::record::LogRecord;
use crate::source::GzipDecompressor;

/// 오브젝트 하나의 처리 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// 배치 로그 계열
    pub family: LogFamily,
    /// 대상 인덱스
    pub index: String,
    /// 공백이 아닌 라인 수
    pub lines: usize,
    /// 레코드로 파싱된 라인 수
    pub parsed: usize,
    /// 거부된 라인 수
    pub rejected: usize,
    /// 인덱싱에 실패한 레코드 수
    pub index_failures: usize,
    /// 발행에 성공한 알림 수
    pub alerts_published: usize,
    /// 발행에 실패한 알림 수
    pub alert_failures: usize,
}

impl BatchReport {
    /// 빈 보고서를 생성합니다.
    pub fn new(dispatch: Dispatch<'_>) -> Self {
        Self {
            family: dispatch.family,
            index: dispatch.index.to_owned(),
            lines: 0,
            parsed: 0,
            rejected: 0,
            index_failures: 0,
            alerts_published: 0,
            alert_failures: 0,
        }
    }

    /// 인덱싱된 레코드 수
    pub fn indexed(&self) -> usize {
        self.parsed - self.index_failures
    }
}

/// 로그 처리기
///
/// 협력자는 `Arc`로 주입되며 프로세스 시작 시 한 번 생성해 호출 간에 공유합니다.
/// 처리기 자체는 불변이므로 여러 호출이 동시에 같은 인스턴스를 사용할 수 있습니다.
pub struct LogProcessor<S, I, A> {
    source: Arc<S>,
    decompressor: Arc<dyn Decompressor>,
    index_sink: Arc<I>,
    alert_sink: Arc<A>,
    classifier: LogClassifier,
    policy: DispatchPolicy,
    evaluator: AlertEvaluator,
    timeout: Option<Duration>,
}

impl<S, I, A> LogProcessor<S, I, A>
where
    S: ObjectSource,
    I: IndexSink,
    A: AlertSink,
{
    /// 저장소 알림 JSON으로 호출 하나를 처리합니다.
    ///
    /// 이벤트 해석에 실패해도 실패 알림을 발행합니다.
    pub async fn handle_event_json(&self, raw: &str) -> Result<ProcessOutcome, LogPipelineError> {
        let event = self.decode_event(raw).await?;
        self.handle(&event).await
    }

    /// 저장소 알림 JSON을 해석합니다. 실패하면 실패 알림을 발행합니다.
    pub async fn decode_event(&self, raw: &str) -> Result<ObjectEvent, LogPipelineError> {
        match ObjectEvent::from_json(raw) {
            Ok(event) => Ok(event),
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    /// 이벤트 하나를 처리합니다.
    ///
    /// 성공하면 공백이 아닌 라인 수를 담은 [`ProcessOutcome`]을 반환합니다.
    pub async fn handle(&self, event: &ObjectEvent) -> Result<ProcessOutcome, LogPipelineError> {
        let report = self.handle_report(event).await?;
        Ok(ProcessOutcome::success(report.lines))
    }

    /// [`handle`](Self::handle)과 같지만 배치 보고서 전체를 반환합니다.
    pub async fn handle_report(&self, event: &ObjectEvent) -> Result<BatchReport, LogPipelineError> {
        match self.process_object(&event.bucket, &event.key).await {
            Ok(report) => Ok(report),
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// 오브젝트 하나를 조회, 해제, 분류합니다.
    ///
    /// 실패 알림은 발행하지 않습니다. 상위 호출([`handle`](Self::handle))이 담당합니다.
    pub async fn process_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<BatchReport, LogPipelineError> {
        let started = Instant::now();
        let dispatch = self.policy.select(key);
        tracing::info!(
            bucket,
            key,
            family = %dispatch.family,
            index = dispatch.index,
            "processing object"
        );

        let raw = self.fetch(bucket, key).await?;
        let data = self.decompress(key, raw).await?;
        let text = String::from_utf8_lossy(&data);

        let report = self.process_lines(&text, dispatch).await;

        metrics::histogram!(m::BATCH_DURATION_SECONDS, m::LABEL_FAMILY => dispatch.family.as_label())
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            bucket,
            key,
            lines = report.lines,
            parsed = report.parsed,
            rejected = report.rejected,
            index_failures = report.index_failures,
            alerts = report.alerts_published,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "object processed"
        );
        Ok(report)
    }

    /// 텍스트의 공백이 아닌 라인을 순서대로 처리합니다.
    pub async fn process_lines(&self, text: &str, dispatch: Dispatch<'_>) -> BatchReport {
        let mut report = BatchReport::new(dispatch);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            report.lines += 1;
            self.process_line(line, dispatch, &mut report).await;
        }
        metrics::counter!(m::LINES_TOTAL, m::LABEL_FAMILY => dispatch.family.as_label())
            .increment(report.lines as u64);
        report
    }

    /// 배치 분류 정책
    pub fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// 라인 분류기
    pub fn classifier(&self) -> &LogClassifier {
        &self.classifier
    }

    async fn process_line(&self, line: &str, dispatch: Dispatch<'_>, report: &mut BatchReport) {
        let family = dispatch.family.as_label();
        let record = match self.classifier.classify(line, dispatch.family) {
            ParseOutcome::Parsed(record) => record,
            ParseOutcome::Rejected(reason) => {
                report.rejected += 1;
                metrics::counter!(m::LINES_REJECTED_TOTAL, m::LABEL_FAMILY => family).increment(1);
                tracing::debug!(family, reason = %reason, "line rejected");
                return;
            }
        };

        report.parsed += 1;
        metrics::counter!(m::RECORDS_PARSED_TOTAL, m::LABEL_FAMILY => family).increment(1);

        if let Err(e) = self.index_record(dispatch.index, &record).await {
            report.index_failures += 1;
            metrics::counter!(m::INDEX_FAILURES_TOTAL).increment(1);
            tracing::warn!(index = dispatch.index, error = %e, "failed to index record");
        }

        if let Some(alert) = self.evaluator.evaluate(&record).to_alert() {
            if self.publish(&alert).await {
                report.alerts_published += 1;
            } else {
                report.alert_failures += 1;
            }
        }
    }

    async fn index_record(&self, index: &str, record: &LogRecord) -> Result<(), LogPipelineError> {
        let document = record.to_document()?;
        self.bounded("index upsert", self.index_sink.upsert(index, &document))
            .await?;
        Ok(())
    }

    /// 알림을 발행합니다. 실패는 로그만 남기고 `false`를 반환합니다.
    async fn publish(&self, alert: &Alert) -> bool {
        let severity = alert.severity.as_label();
        match self.bounded("alert publish", self.alert_sink.publish(alert)).await {
            Ok(()) => {
                metrics::counter!(m::ALERTS_TOTAL, m::LABEL_SEVERITY => severity, m::LABEL_RESULT => "success")
                    .increment(1);
                tracing::debug!(severity, message = %alert.message, "alert published");
                true
            }
            Err(e) => {
                metrics::counter!(m::ALERTS_TOTAL, m::LABEL_SEVERITY => severity, m::LABEL_RESULT => "failure")
                    .increment(1);
                tracing::warn!(
                    sink = self.alert_sink.name(),
                    severity,
                    error = %e,
                    "failed to publish alert"
                );
                false
            }
        }
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes, SourceError> {
        let fut = self.source.fetch(bucket, key);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                SourceError::Transient {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                    reason: format!("fetch timed out after {}ms", millis(limit)),
                }
            })?,
            None => fut.await,
        }
    }

    /// 압축 해제는 CPU 작업이므로 블로킹 스레드 풀에서 실행합니다.
    async fn decompress(&self, key: &str, raw: Bytes) -> Result<Bytes, SourceError> {
        if !self.decompressor.applies_to(key) {
            return Ok(raw);
        }
        let decompressor = Arc::clone(&self.decompressor);
        tokio::task::spawn_blocking(move || decompressor.decompress(raw))
            .await
            .map_err(|e| SourceError::Decompress(format!("decompression task failed: {e}")))?
    }

    async fn bounded<F>(&self, operation: &'static str, fut: F) -> Result<(), SinkError>
    where
        F: Future<Output = Result<(), SinkError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| SinkError::Timeout {
                    operation,
                    timeout_ms: millis(limit),
                })?,
            None => fut.await,
        }
    }

    /// 호출 실패를 기록하고 `ERROR` 알림을 발행한 뒤 에러를 돌려줍니다.
    async fn fail(&self, err: LogPipelineError) -> LogPipelineError {
        metrics::counter!(m::INVOCATION_FAILURES_TOTAL).increment(1);
        tracing::error!(error = %err, "error processing log file");
        self.publish(&failure_alert(&err.to_string())).await;
        err
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// 로그 처리기 빌더
///
/// 오브젝트 소스, 인덱스 싱크, 알림 싱크는 필수입니다.
/// 압축 해제기를 지정하지 않으면 [`GzipDecompressor`]를 사용합니다.
pub struct LogProcessorBuilder<S, I, A> {
    config: ProcessorConfig,
    source: Option<Arc<S>>,
    decompressor: Option<Arc<dyn Decompressor>>,
    index_sink: Option<Arc<I>>,
    alert_sink: Option<Arc<A>>,
}

impl<S, I, A> LogProcessorBuilder<S, I, A>
where
    S: ObjectSource,
    I: IndexSink,
    A: AlertSink,
{
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
            source: None,
            decompressor: None,
            index_sink: None,
            alert_sink: None,
        }
    }

    /// 처리기 설정을 지정합니다.
    pub fn config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// 오브젝트 소스를 지정합니다.
    pub fn source(mut self, source: Arc<S>) -> Self {
        self.source = Some(source);
        self
    }

    /// 압축 해제기를 지정합니다.
    pub fn decompressor(mut self, decompressor: Arc<dyn Decompressor>) -> Self {
        self.decompressor = Some(decompressor);
        self
    }

    /// 인덱스 싱크를 지정합니다.
    pub fn index_sink(mut self, sink: Arc<I>) -> Self {
        self.index_sink = Some(sink);
        self
    }

    /// 알림 싱크를 지정합니다.
    pub fn alert_sink(mut self, sink: Arc<A>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    /// 설정을 검증하고 처리기를 생성합니다.
    pub fn build(self) -> Result<LogProcessor<S, I, A>, LogPipelineError> {
        self.config.validate()?;

        let missing = |field: &str| LogPipelineError::Config {
            field: field.to_owned(),
            reason: "collaborator not provided".to_owned(),
        };
        let source = self.source.ok_or_else(|| missing("source"))?;
        let index_sink = self.index_sink.ok_or_else(|| missing("index_sink"))?;
        let alert_sink = self.alert_sink.ok_or_else(|| missing("alert_sink"))?;
        let decompressor = self
            .decompressor
            .unwrap_or_else(|| Arc::new(GzipDecompressor::new()));

        tracing::debug!(
            source = source.name(),
            index_sink = index_sink.name(),
            alert_sink = alert_sink.name(),
            patterns = self.config.error_patterns.len(),
            "log processor built"
        );

        Ok(LogProcessor {
            source,
            decompressor,
            index_sink,
            alert_sink,
            classifier: LogClassifier::new()?,
            policy: self.config.dispatch_policy(),
            evaluator: self.config.alert_evaluator(),
            timeout: self.config.collaborator_timeout,
        })
    }
}

impl<S, I, A> Default for LogProcessorBuilder<S, I, A>
where
    S: ObjectSource,
    I: IndexSink,
    A: AlertSink,
{
    fn default() -> Self {
        Self::new()
    }
}
