//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 분류 엔진과 처리기 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<LogPipelineError> for LogdropError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 라인 하나의 파싱 실패는 에러가 아니라 [`RejectReason`](crate::parser::RejectReason)으로
//! 표현됩니다. 이 타입은 배치 전체를 중단시키는 실패에만 사용합니다.

use logdrop_core::error::{ConfigError, EventError, LogdropError, SinkError, SourceError};

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 타임스탬프 정규화 실패
    #[error("timestamp error: {encoding}: '{raw}'")]
    Timestamp {
        /// 기대한 인코딩 (iso8601, apache_style)
        encoding: &'static str,
        /// 원본 문자열
        raw: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 트리거 이벤트 에러
    #[error(transparent)]
    Event(#[from] EventError),

    /// 오브젝트 조회/압축 해제 에러
    #[error(transparent)]
    Source(#[from] SourceError),

    /// 싱크 에러
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// 레코드 직렬화 실패
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LogPipelineError> for LogdropError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Config { field, reason } => {
                LogdropError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Event(e) => LogdropError::Event(e),
            LogPipelineError::Source(e) => LogdropError::Source(e),
            LogPipelineError::Sink(e) => LogdropError::Sink(e),
            LogPipelineError::Io(e) => LogdropError::Io(e),
            other => LogdropError::Processing(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_error_display() {
        let err = LogPipelineError::Timestamp {
            encoding: "apache_style",
            raw: "06/Foo/2025:00:39:17 +0000".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("apache_style"));
        assert!(msg.contains("06/Foo/2025"));
    }

    #[test]
    fn source_error_is_transparent() {
        let err: LogPipelineError = SourceError::NotFound {
            bucket: "logs".to_owned(),
            key: "a.log".to_owned(),
        }
        .into();
        assert_eq!(err.to_string(), "object not found: logs/a.log");
    }

    #[test]
    fn converts_source_to_logdrop_source() {
        let err: LogPipelineError = SourceError::Decompress("bad header".to_owned()).into();
        let top: LogdropError = err.into();
        assert!(matches!(top, LogdropError::Source(SourceError::Decompress(_))));
    }

    #[test]
    fn converts_config_to_invalid_value() {
        let err = LogPipelineError::Config {
            field: "server_error_threshold".to_owned(),
            reason: "out of range".to_owned(),
        };
        let top: LogdropError = err.into();
        assert!(matches!(
            top,
            LogdropError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn converts_timestamp_to_processing() {
        let err = LogPipelineError::Timestamp {
            encoding: "iso8601",
            raw: "garbage".to_owned(),
        };
        let top: LogdropError = err.into();
        assert!(matches!(top, LogdropError::Processing(_)));
    }
}
