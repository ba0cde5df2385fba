//! Apache combined 형식 파서
//!
//! ```text
//! 192.168.1.1 - - [10/Feb/2025:00:00:00 +0000] "GET /test HTTP/1.1" 200 1234 "-" "Mozilla/5.0"
//! ^ip         ^ignored [timestamp]              "request"           ^status ^bytes "referer" "user_agent"
//! ```

use regex::Regex;

use crate::error::LogPipelineError;
use crate::parser::{ParseOutcome, RejectReason};
use crate::record::ApacheAccessRecord;
use crate::timestamp::{self, TimestampEncoding};

const COMBINED_PATTERN: &str =
    r#"^(\S+) \S+ \S+ \[([^\]]+)\] "([^"]*)" (\d{3}) (\d+|-) "([^"]*)" "([^"]*)"$"#;

/// Apache combined 형식 파서
pub struct ApacheLogParser {
    pattern: Regex,
}

impl ApacheLogParser {
    /// 패턴을 컴파일하여 파서를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            pattern: Regex::new(COMBINED_PATTERN)?,
        })
    }

    /// 라인 하나를 파싱합니다.
    pub fn parse(&self, line: &str) -> ParseOutcome<ApacheAccessRecord> {
        self.parse_inner(line).into()
    }

    fn parse_inner(&self, line: &str) -> Result<ApacheAccessRecord, RejectReason> {
        let caps = self.pattern.captures(line).ok_or(RejectReason::NoMatch)?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        let timestamp = timestamp::normalize(field(2), TimestampEncoding::ApacheStyle)
            .map_err(|_| RejectReason::Timestamp)?;

        let status = field(4)
            .parse::<u16>()
            .map_err(|_| RejectReason::InvalidNumber { field: "status" })?;

        let bytes = match field(5) {
            "-" => 0,
            raw => raw
                .parse::<u64>()
                .map_err(|_| RejectReason::InvalidNumber { field: "bytes" })?,
        };

        Ok(ApacheAccessRecord {
            timestamp,
            ip: field(1).to_owned(),
            request: field(3).to_owned(),
            status,
            bytes,
            referer: field(6).to_owned(),
            user_agent: field(7).to_owned(),
        })
    }
}
