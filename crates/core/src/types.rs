//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 로그 계열([`LogFamily`]), 알림 심각도([`Severity`]), 알림([`Alert`])을 정의합니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 로그 계열
///
/// 하나의 오브젝트(배치)는 정확히 하나의 계열로 분류되며,
/// 계열이 분류기와 대상 인덱스를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFamily {
    /// `[timestamp] message` 형식의 에러 로그
    Error,
    /// `|` 구분 액세스 로그
    StandardAccess,
    /// Apache combined 형식 액세스 로그
    ApacheAccess,
}

impl LogFamily {
    /// 전체 계열 목록
    pub const ALL: [LogFamily; 3] = [Self::Error, Self::StandardAccess, Self::ApacheAccess];

    /// 문자열에서 계열을 파싱합니다.
    ///
    /// 대소문자를 구분하지 않으며 짧은 별칭(`access`, `apache`)도 허용합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "access" | "standard" | "standard_access" => Some(Self::StandardAccess),
            "apache" | "apache_access" => Some(Self::ApacheAccess),
            _ => None,
        }
    }

    /// 에러 계열 여부
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// 소문자 레이블 (메트릭 레이블, 직렬화 이름과 동일)
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::StandardAccess => "standard_access",
            Self::ApacheAccess => "apache_access",
        }
    }
}

impl fmt::Display for LogFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// 알림 심각도
///
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Info < Warning < Error < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// 정보성
    #[default]
    Info,
    /// 경고 (5xx 응답 등)
    Warning,
    /// 처리 실패
    Error,
    /// 치명적: 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 소문자 레이블 (메트릭 레이블 등에 사용)
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// 알림 싱크로 발행되는 알림
///
/// 직렬화 형식은 `{ id, severity, message, timestamp }` JSON 객체입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// 알림 ID (UUID v4)
    pub id: String,
    /// 심각도
    pub severity: Severity,
    /// 사람이 읽는 알림 메시지
    pub message: String,
    /// 생성 시각
    #[serde(with = "crate::instant")]
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// 현재 시각으로 새 알림을 생성합니다.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            severity,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
