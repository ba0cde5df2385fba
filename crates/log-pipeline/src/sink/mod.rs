//! 인덱스/알림 싱크 구현
//!
//! - [`JsonLinesIndexSink`]: 인덱스별 JSON Lines 파일 (스키마 제공자 겸용)
//! - [`TracingAlertSink`]: tracing 로그 + 선택적 알림 파일

pub mod alert_log;
pub mod index_file;

pub use alert_log::TracingAlertSink;
pub use index_file::JsonLinesIndexSink;
