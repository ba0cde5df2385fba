//! 알림 판정 -- 파싱된 레코드가 알림 대상인지 결정합니다.
//!
//! [`AlertEvaluator`]는 레코드 계열에 따라 두 가지 규칙을 적용합니다.
//!
//! - 에러 로그: 메시지가 치명적 패턴과 일치하면 `CRITICAL`
//! - 액세스 로그: 상태 코드가 임계값(기본 500) 이상이면 `WARNING`
//!
//! 판정은 라인 하나에만 의존하며 상태를 남기지 않습니다.

use logdrop_core::types::{Alert, Severity};

use crate::critical::CriticalMatcher;
use crate::record::LogRecord;

/// `CRITICAL` 알림 메시지 접두어
pub const CRITICAL_PREFIX: &str = "Critical Error Detected: ";
/// 호출 실패 알림 메시지 접두어
pub const FAILURE_PREFIX: &str = "Error processing log file: ";

/// 레코드 하나에 대한 알림 판정
///
/// `should_alert`가 `false`이면 `severity`는 `Info`, `message`는 비어 있습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDecision {
    pub should_alert: bool,
    pub severity: Severity,
    /// 판정 근거 (로그용)
    pub reason: String,
    /// 발행할 알림 메시지
    pub message: String,
}

impl AlertDecision {
    /// 알림 없음
    pub fn none() -> Self {
        Self {
            should_alert: false,
            severity: Severity::Info,
            reason: String::new(),
            message: String::new(),
        }
    }

    /// 알림이 필요하면 [`Alert`]를 생성합니다.
    pub fn to_alert(&self) -> Option<Alert> {
        self.should_alert
            .then(|| Alert::new(self.severity, self.message.clone()))
    }
}

/// `CRITICAL` 알림 메시지
pub fn critical_message(record_message: &str) -> String {
    format!("{CRITICAL_PREFIX}{record_message}")
}

/// 5xx `WARNING` 알림 메시지
pub fn server_error_message(domain: &str) -> String {
    format!("High number of 5xx errors detected for {domain}")
}

/// 호출 실패 `ERROR` 알림
pub fn failure_alert(description: &str) -> Alert {
    Alert::new(Severity::Error, format!("{FAILURE_PREFIX}{description}"))
}

/// 레코드 알림 판정기
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    matcher: CriticalMatcher,
    server_error_threshold: u16,
}

impl AlertEvaluator {
    /// 판정기를 생성합니다.
    pub fn new(matcher: CriticalMatcher, server_error_threshold: u16) -> Self {
        Self {
            matcher,
            server_error_threshold,
        }
    }

    /// 레코드를 판정합니다.
    pub fn evaluate(&self, record: &LogRecord) -> AlertDecision {
        match record {
            LogRecord::Error(r) => match self.matcher.first_match(&r.message) {
                Some(pattern) => AlertDecision {
                    should_alert: true,
                    severity: Severity::Critical,
                    reason: format!("message matched pattern '{pattern}'"),
                    message: critical_message(&r.message),
                },
                None => AlertDecision::none(),
            },
            LogRecord::Access(r) => match r.status {
                Some(status) => self.server_error(status, &r.domain),
                None => AlertDecision::none(),
            },
            // Apache 레코드에는 도메인이 없으므로 클라이언트 IP를 사용
            LogRecord::Apache(r) => self.server_error(r.status, &r.ip),
        }
    }

    fn server_error(&self, status: u16, subject: &str) -> AlertDecision {
        if status < self.server_error_threshold {
            return AlertDecision::none();
        }
        AlertDecision {
            should_alert: true,
            severity: Severity::Warning,
            reason: format!("status {status} >= {}", self.server_error_threshold),
            message: server_error_message(subject),
        }
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(CriticalMatcher::default(), 500)
    }
}
