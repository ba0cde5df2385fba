//! # logdrop-pipeline
//!
//! 업로드된 로그 오브젝트를 읽어 라인 단위로 분류하고, 레코드를 인덱스에 기록하며,
//! 조건에 맞는 라인에 대해 알림을 발행하는 처리 엔진입니다.
//!
//! # 모듈 구성
//!
//! - [`timestamp`]: ISO-8601 / Apache 스타일 타임스탬프 정규화
//! - [`parser`]: 에러 로그, `|` 구분 액세스 로그, Apache combined 로그 분류기
//! - [`record`]: 분류 결과 레코드 ([`LogRecord`])
//! - [`critical`]: 치명적 메시지 판별
//! - [`dispatch`]: 오브젝트 키 기반 배치 계열/인덱스 결정
//! - [`alert`]: 레코드 알림 판정
//! - [`processor`]: 호출 오케스트레이션 ([`LogProcessor`])
//! - [`schema`]: 인덱스 필드 매핑
//! - [`source`], [`sink`]: 로컬 협력자 구현
//! - [`config`]: 처리기 설정 (core 설정에서 파생)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! ObjectEvent -> ObjectSource -> Decompressor -> DispatchPolicy -> LogClassifier
//!                                                                     |
//!                                              IndexSink <- record <--+--> AlertEvaluator -> AlertSink
//! ```

pub mod alert;
pub mod config;
pub mod critical;
pub mod dispatch;
pub mod error;
pub mod parser;
pub mod processor;
pub mod record;
pub mod schema;
pub mod sink;
pub mod source;
pub mod timestamp;

// --- 주요 타입 re-export ---

// 처리기
pub use processor::{BatchReport, LogProcessor, LogProcessorBuilder};

// 설정
pub use config::{ProcessorConfig, ProcessorConfigBuilder};

// 에러
pub use error::LogPipelineError;

// 분류
pub use critical::{CriticalMatcher, is_critical};
pub use dispatch::{Dispatch, DispatchPolicy, ErrorMarkerMode, IndexNames};
pub use parser::{LogClassifier, ParseOutcome, RejectReason};
pub use record::{AccessRecord, ApacheAccessRecord, ErrorRecord, LogRecord};
pub use timestamp::{TimestampEncoding, normalize};

// 알림
pub use alert::{AlertDecision, AlertEvaluator};
