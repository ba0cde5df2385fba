//! 협력자 trait: 코어가 호출하는 외부 I/O 경계
//!
//! 분류 엔진은 순수 함수로 구성되며, 저장소 조회, 압축 해제, 인덱싱, 알림 발행은
//! 모두 이 모듈의 trait을 통해 주입된 협력자가 담당합니다.
//!
//! # 구조
//! ```text
//!  ObjectSource ──bytes──> Decompressor ──bytes──> (lines) ──> classifier
//!                                                               │
//!                                        IndexSink <── record ──┤
//!                                        AlertSink <── alert ───┘
//! ```
//!
//! 비동기 메서드는 `impl Future + Send`를 반환하므로 구현체는 `async fn`으로
//! 작성할 수 있습니다. 모든 협력자는 프로세스 시작 시 한 번 생성되어
//! `Arc`로 공유됩니다.

use std::future::Future;

use bytes::Bytes;

use crate::error::{SinkError, SourceError};
use crate::types::Alert;

/// 오브젝트 저장소에서 원시 바이트를 가져오는 협력자
pub trait ObjectSource: Send + Sync + 'static {
    /// 소스 이름 (로그용)
    fn name(&self) -> &str;

    /// `bucket`/`key` 오브젝트 전체를 읽습니다.
    ///
    /// # Errors
    ///
    /// - 오브젝트가 없으면 `SourceError::NotFound`
    /// - 그 외 I/O 실패는 `SourceError::Transient`
    fn fetch(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<Bytes, SourceError>> + Send;
}

/// 압축 해제 협력자
///
/// 동기 trait이며 `Arc<dyn Decompressor>`로 사용할 수 있습니다.
/// 처리기는 `decompress`를 블로킹 스레드 풀(`spawn_blocking`)에서 호출합니다.
pub trait Decompressor: Send + Sync {
    /// 이 키의 오브젝트에 압축 해제를 적용해야 하는지 여부
    fn applies_to(&self, key: &str) -> bool;

    /// 압축을 해제합니다.
    fn decompress(&self, data: Bytes) -> Result<Bytes, SourceError>;
}

/// 압축 해제를 하지 않는 협력자
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Decompressor for Passthrough {
    fn applies_to(&self, _key: &str) -> bool {
        false
    }

    fn decompress(&self, data: Bytes) -> Result<Bytes, SourceError> {
        Ok(data)
    }
}

/// 검색 인덱스 싱크
pub trait IndexSink: Send + Sync + 'static {
    /// 싱크 이름 (로그용)
    fn name(&self) -> &str;

    /// 문서 하나를 `index`에 기록합니다.
    ///
    /// `document`는 레코드의 JSON 객체 직렬화입니다.
    fn upsert(
        &self,
        index: &str,
        document: &serde_json::Value,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// 알림 싱크
pub trait AlertSink: Send + Sync + 'static {
    /// 싱크 이름 (로그용)
    fn name(&self) -> &str;

    /// 알림 하나를 발행합니다.
    fn publish(&self, alert: &Alert) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// 인덱스 스키마 제공자 (설정 단계 전용)
///
/// 레코드가 기록되기 전에 인덱스가 고정된 필드 매핑으로 존재하도록 보장합니다.
pub trait IndexSchemaProvider: Send + Sync + 'static {
    /// 인덱스가 존재하지 않으면 `mapping`으로 생성합니다. 이미 있으면 아무 것도 하지 않습니다.
    fn ensure_index(
        &self,
        index: &str,
        mapping: &serde_json::Value,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}
