//! 트리거 이벤트와 처리 결과
//!
//! 한 번의 호출은 업로드된 오브젝트 하나(`bucket`, `key`)를 처리합니다.
//! 저장소 알림은 `Records[].s3.bucket.name` / `Records[].s3.object.key` 구조이며,
//! 첫 번째 레코드만 사용합니다. 키는 퍼센트 인코딩되어 있으므로 사용 전에 디코딩합니다.

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// 성공 응답 메시지
pub const SUCCESS_MESSAGE: &str = "Logs processed successfully";

/// 처리 대상 오브젝트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEvent {
    /// 버킷 이름
    pub bucket: String,
    /// 디코딩된 오브젝트 키
    pub key: String,
}

#[derive(Deserialize)]
struct Notification {
    #[serde(rename = "Records", default)]
    records: Vec<NotificationRecord>,
}

#[derive(Deserialize)]
struct NotificationRecord {
    s3: S3Entity,
}

#[derive(Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Deserialize)]
struct ObjectEntity {
    key: String,
}

impl ObjectEvent {
    /// 이미 디코딩된 버킷/키로 이벤트를 생성합니다.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// 저장소 알림 JSON에서 이벤트를 추출합니다.
    ///
    /// 첫 번째 레코드의 버킷과 (디코딩된) 키를 사용합니다.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let notification: Notification =
            serde_json::from_str(raw).map_err(|e| EventError::Malformed(e.to_string()))?;
        Self::from_notification(notification)
    }

    /// 이미 파싱된 JSON 값에서 이벤트를 추출합니다.
    pub fn from_value(value: serde_json::Value) -> Result<Self, EventError> {
        let notification: Notification =
            serde_json::from_value(value).map_err(|e| EventError::Malformed(e.to_string()))?;
        Self::from_notification(notification)
    }

    fn from_notification(notification: Notification) -> Result<Self, EventError> {
        let record = notification
            .records
            .into_iter()
            .next()
            .ok_or(EventError::NoRecords)?;

        let key = decode_key(&record.s3.object.key)?;
        Ok(Self {
            bucket: record.s3.bucket.name,
            key,
        })
    }

    /// 경로 분류에 사용하는 `bucket/key` 표현
    pub fn path(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }
}

/// 퍼센트 인코딩된 오브젝트 키를 디코딩합니다.
///
/// `%XX` 시퀀스를 바이트로 복원한 뒤 UTF-8로 해석합니다.
/// `+`는 공백으로 바꾸지 않고 그대로 둡니다.
///
/// # Errors
///
/// `%` 뒤에 16진수 두 자리가 오지 않거나, 디코딩 결과가 올바른 UTF-8이 아니면
/// `EventError::InvalidKey`를 반환합니다.
pub fn decode_key(raw: &str) -> Result<String, EventError> {
    let invalid = |reason: &str| EventError::InvalidKey {
        key: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
            let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                _ => return Err(invalid("malformed percent escape")),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| invalid("decoded key is not valid UTF-8"))
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// 성공한 호출의 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    /// HTTP 스타일 상태 코드 (성공 시 200)
    pub status_code: u16,
    /// 결과 메시지
    pub message: String,
    /// 처리한 (공백이 아닌) 라인 수
    pub lines_processed: usize,
}

impl ProcessOutcome {
    /// 성공 결과를 생성합니다.
    pub fn success(lines_processed: usize) -> Self {
        Self {
            status_code: 200,
            message: SUCCESS_MESSAGE.to_owned(),
            lines_processed,
        }
    }
}
