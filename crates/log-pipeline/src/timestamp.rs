//! 타임스탬프 정규화
//!
//! 두 가지 텍스트 날짜 표현을 하나의 UTC 시각으로 변환합니다.
//!
//! | 인코딩 | 예시 |
//! |--------|------|
//! | `iso8601` | `2025-02-09T06:14:09.326787+00:00`, `2025-02-09T06:14:09Z` |
//! | `apache_style` | `06/Feb/2025:00:39:17 +0000` |
//!
//! 결과는 밀리초 정밀도로 잘립니다.
//!
//! # Apache 형식의 오프셋
//!
//! `apache_style`은 `+ZZZZ` 오프셋을 형식 검사에만 사용하고 값은 버립니다.
//! 날짜와 시각을 `YYYY-MM-DDTHH:MM:SS.000Z`로 재조립하여 그대로 UTC로 취급하므로,
//! `+0900` 입력은 실제 UTC보다 9시간 늦은 시각이 됩니다. 기존 인덱스 데이터와의
//! 호환을 위해 변환하지 않습니다.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc};

use crate::error::LogPipelineError;

/// 입력 타임스탬프 인코딩
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampEncoding {
    /// RFC 3339 / ISO-8601 (오프셋 또는 `Z` 필수)
    Iso8601,
    /// `DD/Mon/YYYY:HH:MM:SS +ZZZZ`
    ApacheStyle,
}

impl TimestampEncoding {
    /// 인코딩 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::ApacheStyle => "apache_style",
        }
    }
}

impl fmt::Display for TimestampEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `DD/Mon/YYYY:HH:MM:SS +ZZZZ`의 길이
const APACHE_LEN: usize = 26;

/// 원시 타임스탬프를 UTC 시각으로 정규화합니다.
///
/// # Errors
///
/// 형식이 맞지 않거나 존재하지 않는 날짜/시각이면 `LogPipelineError::Timestamp`를
/// 반환합니다. 어떤 입력에도 패닉하지 않습니다.
pub fn normalize(raw: &str, encoding: TimestampEncoding) -> Result<DateTime<Utc>, LogPipelineError> {
    let parsed = match encoding {
        TimestampEncoding::Iso8601 => parse_iso8601(raw),
        TimestampEncoding::ApacheStyle => parse_apache_style(raw),
    };

    parsed
        .map(|dt| dt.trunc_subsecs(3))
        .ok_or_else(|| LogPipelineError::Timestamp {
            encoding: encoding.as_str(),
            raw: raw.to_owned(),
        })
}

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 위치 기반으로 `DD/Mon/YYYY:HH:MM:SS +ZZZZ`를 해석합니다.
fn parse_apache_style(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim().as_bytes();
    if s.len() != APACHE_LEN {
        return None;
    }

    // 고정 구분자 위치 검사
    let separators = [
        (2, b'/'),
        (6, b'/'),
        (11, b':'),
        (14, b':'),
        (17, b':'),
        (20, b' '),
    ];
    if separators.iter().any(|&(i, c)| s[i] != c) {
        return None;
    }
    if s[21] != b'+' && s[21] != b'-' {
        return None;
    }
    // 오프셋은 숫자 네 자리인지만 확인하고 버림
    if !s[22..26].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let day = digits(&s[0..2])?;
    let month_name = std::str::from_utf8(&s[3..6]).ok()?;
    let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    let year = digits(&s[7..11])?;
    let hour = digits(&s[12..14])?;
    let minute = digits(&s[15..17])?;
    let second = digits(&s[18..20])?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time).and_utc())
}

fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}
