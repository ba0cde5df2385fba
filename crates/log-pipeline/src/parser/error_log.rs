//! 에러 로그 파서
//!
//! `[<timestamp>] <message>` 형식의 라인을 [`ErrorRecord`]로 변환합니다.
//!
//! # 반복 메시지 접기
//! 메시지에 `message repeated N times: [<inner>]`가 포함되면 `<inner>`를
//! 메시지로, `N`을 반복 횟수로 사용합니다.
//!
//! ```text
//! [2025-02-09T06:14:09.326787+00:00] message repeated 4 times: [ enforcing rate limit ]
//!   -> message = "enforcing rate limit", repeat_count = 4
//! ```

use regex::Regex;

use crate::error::LogPipelineError;
use crate::parser::{ParseOutcome, RejectReason};
use crate::record::ErrorRecord;
use crate::timestamp::{self, TimestampEncoding};

/// 대괄호 안 타임스탬프는 숫자와 `T : . + -`만 허용
const LINE_PATTERN: &str = r"^\[([0-9T:.+\-]+)\] (.+)$";
const REPEAT_PATTERN: &str = r"message repeated (\d+) times: \[(.*)\]";

/// 에러 로그 파서
pub struct ErrorLogParser {
    line: Regex,
    repeat: Regex,
}

impl ErrorLogParser {
    /// 패턴을 컴파일하여 파서를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            line: Regex::new(LINE_PATTERN)?,
            repeat: Regex::new(REPEAT_PATTERN)?,
        })
    }

    /// 라인 하나를 파싱합니다.
    pub fn parse(&self, line: &str) -> ParseOutcome<ErrorRecord> {
        self.parse_inner(line).into()
    }

    fn parse_inner(&self, line: &str) -> Result<ErrorRecord, RejectReason> {
        let caps = self.line.captures(line).ok_or(RejectReason::NoMatch)?;
        let raw_ts = caps.get(1).map_or("", |m| m.as_str());
        let message = caps.get(2).map_or("", |m| m.as_str());

        let timestamp = timestamp::normalize(raw_ts, TimestampEncoding::Iso8601)
            .map_err(|_| RejectReason::Timestamp)?;

        let (message, repeat_count) = match self.repeat.captures(message) {
            Some(repeat) => {
                let count = repeat
                    .get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .filter(|n| *n >= 1)
                    .ok_or(RejectReason::InvalidRepeatCount)?;
                let inner = repeat.get(2).map_or("", |m| m.as_str());
                (inner.trim(), count)
            }
            None => (message.trim(), 1),
        };

        Ok(ErrorRecord {
            timestamp,
            message: message.to_owned(),
            repeat_count,
        })
    }
}
