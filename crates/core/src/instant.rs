//! 정규화된 시각(instant)의 직렬화 형식
//!
//! 모든 레코드와 알림의 시각은 UTC 기준 밀리초 정밀도의
//! `YYYY-MM-DDTHH:MM:SS.sssZ` 문자열로 직렬화됩니다.
//!
//! serde `with` 속성과 함께 사용합니다.
//! ```ignore
//! #[serde(with = "logdrop_core::instant")]
//! pub timestamp: DateTime<Utc>,
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// 시각을 정규 문자열로 변환합니다.
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// serde 직렬화 함수
pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(instant))
}

/// serde 역직렬화 함수 (RFC 3339 문자열)
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_millis_and_z_suffix() {
        let instant = Utc.with_ymd_and_hms(2025, 2, 6, 0, 39, 17).unwrap();
        assert_eq!(format(&instant), "2025-02-06T00:39:17.000Z");
    }

    #[test]
    fn serde_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "super")]
            at: DateTime<Utc>,
        }

        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let json = serde_json::to_string(&Wrapper { at }).unwrap();
        assert_eq!(json, r#"{"at":"2024-12-31T23:59:59.000Z"}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, at);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        #[derive(Debug, serde::Deserialize)]
        struct Wrapper {
            #[allow(dead_code)]
            #[serde(with = "super")]
            at: DateTime<Utc>,
        }

        let result: Result<Wrapper, _> = serde_json::from_str(r#"{"at":"yesterday"}"#);
        assert!(result.is_err());
    }
}
