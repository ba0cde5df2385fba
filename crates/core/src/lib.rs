//! # logdrop-core
//!
//! logdrop 워크스페이스의 공통 기반 크레이트입니다.
//!
//! - [`types`]: 로그 계열, 심각도, 알림
//! - [`pipeline`]: 오브젝트 소스, 압축 해제, 인덱스/알림 싱크 협력자 trait
//! - [`event`]: 저장소 알림 이벤트와 처리 결과
//! - [`config`]: `logdrop.toml` 설정
//! - [`error`]: 도메인 에러
//! - [`metrics`]: 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod event;
pub mod instant;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, EventError, LogdropError, SinkError, SourceError};

// 설정
pub use config::LogdropConfig;

// 이벤트
pub use event::{ObjectEvent, ProcessOutcome};

// 협력자 trait
pub use pipeline::{AlertSink, Decompressor, IndexSchemaProvider, IndexSink, ObjectSource};

// 도메인 타입
pub use types::{Alert, LogFamily, Severity};
