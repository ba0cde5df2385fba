//! `|` 구분 액세스 로그 파서
//!
//! ```text
//! 06/Feb/2025:00:39:17 +0000|v1|91.242.95.38|jeremypollock.me|200|56701|127.0.0.1:9002|0.001|0.001|GET / HTTP/1.0
//! ^timestamp                 ^version ^ip   ^domain          ^status ^bytes ^server  ^resp ^total ^request
//! ```
//!
//! 10번째 이후 필드는 무시합니다. 숫자 필드는 최선 노력으로 읽으며,
//! 읽을 수 없어도 라인을 거부하지 않습니다.

use crate::parser::numeric::{leading_float, leading_unsigned};
use crate::parser::{ParseOutcome, RejectReason};
use crate::record::AccessRecord;
use crate::timestamp::{self, TimestampEncoding};

/// 필요한 최소 필드 수
pub const MIN_FIELDS: usize = 10;

/// 액세스 로그 파서
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLogParser;

impl AccessLogParser {
    /// 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 라인 하나를 파싱합니다.
    pub fn parse(&self, line: &str) -> ParseOutcome<AccessRecord> {
        parse_fields(line).into()
    }
}

fn parse_fields(line: &str) -> Result<AccessRecord, RejectReason> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < MIN_FIELDS {
        return Err(RejectReason::TooFewFields {
            found: fields.len(),
            required: MIN_FIELDS,
        });
    }

    let timestamp = timestamp::normalize(fields[0], TimestampEncoding::ApacheStyle)
        .map_err(|_| RejectReason::Timestamp)?;

    let bytes = match fields[5].trim() {
        "-" => Some(0),
        raw => leading_unsigned(raw),
    };

    Ok(AccessRecord {
        timestamp,
        version: fields[1].to_owned(),
        ip: fields[2].to_owned(),
        domain: fields[3].to_owned(),
        status: leading_unsigned(fields[4]),
        bytes,
        server: fields[6].to_owned(),
        response_time: leading_float(fields[7]),
        total_time: leading_float(fields[8]),
        request: fields[9].to_owned(),
    })
}
