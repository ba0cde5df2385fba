//! 에러 타입: 도메인별 에러 정의

/// logdrop 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogdropError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 트리거 이벤트 해석 에러
    #[error("event error: {0}")]
    Event(#[from] EventError),

    /// 오브젝트 조회/해제 에러
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 인덱스/알림 싱크 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// 분류/처리 단계 에러
    #[error("processing error: {0}")]
    Processing(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 트리거 이벤트 에러
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// 이벤트 JSON 구조가 기대와 다름
    #[error("malformed event: {0}")]
    Malformed(String),

    /// 이벤트에 레코드가 없음
    #[error("event contains no records")]
    NoRecords,

    /// 퍼센트 인코딩된 키 디코딩 실패
    #[error("invalid object key encoding '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

/// 오브젝트 소스 / 압축 해제 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 오브젝트가 존재하지 않음
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// 일시적 실패 (네트워크, 권한 등)
    #[error("transient failure fetching {bucket}/{key}: {reason}")]
    Transient {
        bucket: String,
        key: String,
        reason: String,
    },

    /// 소스가 허용하지 않는 키 (경로 탈출 등)
    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// 압축 해제 실패
    #[error("decompression failed: {0}")]
    Decompress(String),
}

/// 싱크(인덱스, 알림, 스키마) 에러
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 인덱스 upsert 실패
    #[error("index '{index}' upsert failed: {reason}")]
    Index { index: String, reason: String },

    /// 알림 발행 실패
    #[error("alert publish failed: {0}")]
    Alert(String),

    /// 인덱스 스키마 보장 실패
    #[error("index '{index}' schema setup failed: {reason}")]
    Schema { index: String, reason: String },

    /// 호출 시간 초과
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_object() {
        let err = SourceError::NotFound {
            bucket: "logs".to_owned(),
            key: "error/app.log".to_owned(),
        };
        assert_eq!(err.to_string(), "object not found: logs/error/app.log");
    }

    #[test]
    fn sink_error_converts_to_top_level() {
        let err: LogdropError = SinkError::Alert("topic missing".to_owned()).into();
        assert!(matches!(err, LogdropError::Sink(SinkError::Alert(_))));
        assert!(err.to_string().contains("topic missing"));
    }

    #[test]
    fn timeout_display() {
        let err = SinkError::Timeout {
            operation: "index upsert",
            timeout_ms: 250,
        };
        assert_eq!(err.to_string(), "index upsert timed out after 250ms");
    }

    #[test]
    fn invalid_key_display() {
        let err = EventError::InvalidKey {
            key: "bad%zz".to_owned(),
            reason: "invalid escape".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bad%zz"));
        assert!(msg.contains("invalid escape"));
    }
}
