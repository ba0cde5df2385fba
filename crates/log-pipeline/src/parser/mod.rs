//! 로그 라인 분류 모듈 -- 계열별 파서
//!
//! [`LogClassifier`]는 배치의 로그 계열에 맞는 파서로 라인을 분류합니다.
//! 모든 파서는 전체 함수(total function)이며, 실패를 패닉이나 에러가 아닌
//! [`ParseOutcome::Rejected`]로 표현합니다.
//!
//! # 지원 계열
//! - 에러 로그 ([`ErrorLogParser`])
//! - `|` 구분 액세스 로그 ([`AccessLogParser`])
//! - Apache combined 액세스 로그 ([`ApacheLogParser`])
//!
//! # 사용 예시
//! ```
//! use logdrop_core::types::LogFamily;
//! use logdrop_pipeline::parser::{LogClassifier, ParseOutcome};
//!
//! let classifier = LogClassifier::new()?;
//! let outcome = classifier.classify("This is not a valid log line", LogFamily::Error);
//! assert!(matches!(outcome, ParseOutcome::Rejected(_)));
//! # Ok::<(), logdrop_pipeline::LogPipelineError>(())
//! ```

pub mod access;
pub mod apache;
pub mod error_log;
pub mod numeric;

pub use access::AccessLogParser;
pub use apache::ApacheLogParser;
pub use error_log::ErrorLogParser;

use std::fmt;

use logdrop_core::types::LogFamily;

use crate::error::LogPipelineError;
use crate::record::LogRecord;

/// 라인 거부 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// 계열의 라인 패턴과 일치하지 않음
    NoMatch,
    /// `|` 필드 수 부족
    TooFewFields { found: usize, required: usize },
    /// 타임스탬프를 정규화할 수 없음
    Timestamp,
    /// 반복 횟수가 0이거나 범위를 넘음
    InvalidRepeatCount,
    /// 필수 숫자 필드를 읽을 수 없음
    InvalidNumber { field: &'static str },
}

impl RejectReason {
    /// 짧은 레이블 (로그/메트릭용)
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::TooFewFields { .. } => "too_few_fields",
            Self::Timestamp => "timestamp",
            Self::InvalidRepeatCount => "repeat_count",
            Self::InvalidNumber { .. } => "number",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "line does not match the expected pattern"),
            Self::TooFewFields { found, required } => {
                write!(f, "expected at least {required} fields, found {found}")
            }
            Self::Timestamp => write!(f, "unparsable timestamp"),
            Self::InvalidRepeatCount => write!(f, "invalid repeat count"),
            Self::InvalidNumber { field } => write!(f, "invalid number in field '{field}'"),
        }
    }
}

/// 라인 하나의 분류 결과
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// 레코드 생성 성공
    Parsed(T),
    /// 거부됨 (배치는 계속 진행)
    Rejected(RejectReason),
}

impl<T> ParseOutcome<T> {
    /// 파싱 성공 여부
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// 레코드를 변환합니다.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            Self::Parsed(v) => ParseOutcome::Parsed(f(v)),
            Self::Rejected(reason) => ParseOutcome::Rejected(reason),
        }
    }

    /// 성공한 레코드만 꺼냅니다.
    pub fn parsed(self) -> Option<T> {
        match self {
            Self::Parsed(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }
}

impl<T> From<Result<T, RejectReason>> for ParseOutcome<T> {
    fn from(result: Result<T, RejectReason>) -> Self {
        match result {
            Ok(v) => Self::Parsed(v),
            Err(reason) => Self::Rejected(reason),
        }
    }
}

/// 계열별 파서 묶음
///
/// 정규식은 생성 시 한 번 컴파일되며, 이후 분류는 상태를 갖지 않습니다.
/// 같은 라인을 두 번 분류하면 같은 레코드가 나옵니다.
pub struct LogClassifier {
    error: ErrorLogParser,
    access: AccessLogParser,
    apache: ApacheLogParser,
}

impl LogClassifier {
    /// 모든 파서를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            error: ErrorLogParser::new()?,
            access: AccessLogParser::new(),
            apache: ApacheLogParser::new()?,
        })
    }

    /// 라인을 주어진 계열로 분류합니다.
    pub fn classify(&self, line: &str, family: LogFamily) -> ParseOutcome<LogRecord> {
        match family {
            LogFamily::Error => self.error.parse(line).map(LogRecord::Error),
            LogFamily::StandardAccess => self.access.parse(line).map(LogRecord::Access),
            LogFamily::ApacheAccess => self.apache.parse(line).map(LogRecord::Apache),
        }
    }

    /// 에러 로그 파서
    pub fn error_parser(&self) -> &ErrorLogParser {
        &self.error
    }

    /// 액세스 로그 파서
    pub fn access_parser(&self) -> &AccessLogParser {
        &self.access
    }

    /// Apache 로그 파서
    pub fn apache_parser(&self) -> &ApacheLogParser {
        &self.apache
    }
}
