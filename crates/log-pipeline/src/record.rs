//! 분류 결과 레코드
//!
//! [`LogRecord`]는 세 가지 로그 계열의 레코드를 담는 닫힌 합 타입입니다.
//! 직렬화 시 `type` 태그(`error`, `access`, `apache`)가 붙으며, 필드 이름은
//! 인덱스 문서의 필드 이름과 같습니다.
//!
//! ```text
//! {"type":"error","timestamp":"2025-02-09T06:14:09.326Z","message":"...","repeat_count":4}
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use logdrop_core::instant;
use logdrop_core::types::LogFamily;
use serde::{Deserialize, Serialize};

/// 에러 로그 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(with = "instant")]
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// 반복 횟수 (1 이상)
    pub repeat_count: u32,
}

/// `|` 구분 액세스 로그 레코드
///
/// 숫자 필드는 최선 노력으로 읽으며, 읽을 수 없으면 `None`(JSON `null`)입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    #[serde(with = "instant")]
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub ip: String,
    pub domain: String,
    pub status: Option<u16>,
    pub bytes: Option<u64>,
    pub server: String,
    pub response_time: Option<f64>,
    pub total_time: Option<f64>,
    pub request: String,
}

/// Apache combined 형식 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApacheAccessRecord {
    #[serde(with = "instant")]
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub request: String,
    pub status: u16,
    pub bytes: u64,
    pub referer: String,
    pub user_agent: String,
}

/// 라인 하나의 분류 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LogRecord {
    #[serde(rename = "error")]
    Error(ErrorRecord),
    #[serde(rename = "access")]
    Access(AccessRecord),
    #[serde(rename = "apache")]
    Apache(ApacheAccessRecord),
}

impl LogRecord {
    /// 레코드의 로그 계열
    pub fn family(&self) -> LogFamily {
        match self {
            Self::Error(_) => LogFamily::Error,
            Self::Access(_) => LogFamily::StandardAccess,
            Self::Apache(_) => LogFamily::ApacheAccess,
        }
    }

    /// 정규화된 시각
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Error(r) => r.timestamp,
            Self::Access(r) => r.timestamp,
            Self::Apache(r) => r.timestamp,
        }
    }

    /// HTTP 상태 코드 (에러 로그와 상태를 읽지 못한 액세스 로그는 `None`)
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Error(_) => None,
            Self::Access(r) => r.status,
            Self::Apache(r) => Some(r.status),
        }
    }

    /// 인덱스 문서로 직렬화합니다.
    pub fn to_document(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// 한 줄 요약 (검증/CLI 출력용)
    pub fn summary(&self) -> String {
        let ts = instant::format(&self.timestamp());
        match self {
            Self::Error(r) if r.repeat_count > 1 => {
                format!("{ts} error {} (x{})", r.message, r.repeat_count)
            }
            Self::Error(r) => format!("{ts} error {}", r.message),
            Self::Access(r) => format!(
                "{ts} access {} {} {} {}",
                r.ip,
                r.domain,
                display_opt(r.status),
                r.request
            ),
            Self::Apache(r) => format!("{ts} apache {} {} {}", r.ip, r.status, r.request),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn display_opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 6, 0, 39, 17).unwrap()
    }

    fn access(status: Option<u16>) -> AccessRecord {
        AccessRecord {
            timestamp: at(),
            version: "v1".to_owned(),
            ip: "91.242.95.38".to_owned(),
            domain: "jeremypollock.me".to_owned(),
            status,
            bytes: Some(56701),
            server: "127.0.0.1:9002".to_owned(),
            response_time: Some(0.001),
            total_time: None,
            request: "GET / HTTP/1.0".to_owned(),
        }
    }

    #[test]
    fn error_document_has_type_tag_and_fields() {
        let record = LogRecord::Error(ErrorRecord {
            timestamp: at(),
            message: "enforcing rate limit".to_owned(),
            repeat_count: 4,
        });
        let doc = record.to_document().unwrap();
        assert_eq!(doc["type"], "error");
        assert_eq!(doc["timestamp"], "2025-02-06T00:39:17.000Z");
        assert_eq!(doc["message"], "enforcing rate limit");
        assert_eq!(doc["repeat_count"], 4);
    }

    #[test]
    fn access_document_uses_null_for_absent_numbers() {
        let doc = LogRecord::Access(access(None)).to_document().unwrap();
        assert_eq!(doc["type"], "access");
        assert!(doc["status"].is_null());
        assert!(doc["total_time"].is_null());
        assert_eq!(doc["bytes"], 56701);
        assert_eq!(doc["domain"], "jeremypollock.me");
    }

    #[test]
    fn apache_document_fields() {
        let record = LogRecord::Apache(ApacheAccessRecord {
            timestamp: at(),
            ip: "192.168.1.1".to_owned(),
            request: "GET /test HTTP/1.1".to_owned(),
            status: 200,
            bytes: 1234,
            referer: "-".to_owned(),
            user_agent: "Mozilla/5.0".to_owned(),
        });
        let doc = record.to_document().unwrap();
        assert_eq!(doc["type"], "apache");
        assert_eq!(doc["user_agent"], "Mozilla/5.0");
        assert_eq!(record.status(), Some(200));
        assert_eq!(record.family(), LogFamily::ApacheAccess);
    }

    #[test]
    fn document_deserializes_back() {
        let record = LogRecord::Access(access(Some(503)));
        let doc = record.to_document().unwrap();
        let back: LogRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn summary_formats() {
        let record = LogRecord::Error(ErrorRecord {
            timestamp: at(),
            message: "disk full".to_owned(),
            repeat_count: 3,
        });
        assert_eq!(
            record.summary(),
            "2025-02-06T00:39:17.000Z error disk full (x3)"
        );
        assert_eq!(
            LogRecord::Access(access(None)).to_string(),
            "2025-02-06T00:39:17.000Z access 91.242.95.38 jeremypollock.me - GET / HTTP/1.0"
        );
    }
}
