//! 처리기 설정
//!
//! [`ProcessorConfig`]는 core의 [`LogdropConfig`](logdrop_core::config::LogdropConfig)에서
//! `[processor]`, `[indices]` 섹션을 읽어 처리기 전용 타입으로 변환한 설정입니다.
//!
//! # 사용 예시
//! ```
//! use logdrop_core::config::LogdropConfig;
//! use logdrop_pipeline::config::ProcessorConfig;
//!
//! let core_config = LogdropConfig::default();
//! let config = ProcessorConfig::from_core(&core_config)?;
//! assert_eq!(config.server_error_threshold, 500);
//! # Ok::<(), logdrop_pipeline::LogPipelineError>(())
//! ```

use std::time::Duration;

use logdrop_core::config::LogdropConfig;

use crate::alert::AlertEvaluator;
use crate::critical::CriticalMatcher;
use crate::dispatch::{DispatchPolicy, ErrorMarkerMode, IndexNames};
use crate::error::LogPipelineError;

/// 처리기 설정
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// 치명적 패턴 목록
    pub error_patterns: Vec<String>,
    /// 에러 로그 경로 조각
    pub error_path_marker: String,
    /// 에러 로그 판별 방식
    pub error_marker_mode: ErrorMarkerMode,
    /// Apache 형식 파일 이름 조각
    pub apache_name_marker: String,
    /// `WARNING` 알림 최소 상태 코드
    pub server_error_threshold: u16,
    /// 인덱스/알림 호출 타임아웃 (`None`이면 무제한)
    pub collaborator_timeout: Option<Duration>,
    /// 대상 인덱스 이름
    pub indices: IndexNames,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            error_patterns: Vec::new(),
            error_path_marker: "/error/".to_owned(),
            error_marker_mode: ErrorMarkerMode::PathFragment,
            apache_name_marker: "apachestyle.log".to_owned(),
            server_error_threshold: 500,
            collaborator_timeout: None,
            indices: IndexNames::default(),
        }
    }
}

impl ProcessorConfig {
    /// core 설정에서 처리기 설정을 생성합니다.
    pub fn from_core(core: &LogdropConfig) -> Result<Self, LogPipelineError> {
        let section = &core.processor;
        let error_marker_mode = ErrorMarkerMode::from_config(&section.error_marker_mode)
            .ok_or_else(|| LogPipelineError::Config {
                field: "processor.error_marker_mode".to_owned(),
                reason: format!("unknown mode '{}'", section.error_marker_mode),
            })?;

        let config = Self {
            error_patterns: section.error_patterns.clone(),
            error_path_marker: section.error_path_marker.clone(),
            error_marker_mode,
            apache_name_marker: section.apache_name_marker.clone(),
            server_error_threshold: section.server_error_threshold,
            collaborator_timeout: (section.collaborator_timeout_ms > 0)
                .then(|| Duration::from_millis(section.collaborator_timeout_ms)),
            indices: IndexNames::from(&core.indices),
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        if self.error_path_marker.is_empty() {
            return Err(LogPipelineError::Config {
                field: "error_path_marker".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.apache_name_marker.is_empty() {
            return Err(LogPipelineError::Config {
                field: "apache_name_marker".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if !(100..=599).contains(&self.server_error_threshold) {
            return Err(LogPipelineError::Config {
                field: "server_error_threshold".to_owned(),
                reason: format!("{} is not an HTTP status", self.server_error_threshold),
            });
        }

        if self.error_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(LogPipelineError::Config {
                field: "error_patterns".to_owned(),
                reason: "patterns must not be blank".to_owned(),
            });
        }

        let names = [
            &self.indices.error,
            &self.indices.access,
            &self.indices.apache,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(LogPipelineError::Config {
                field: "indices".to_owned(),
                reason: "index names must not be empty".to_owned(),
            });
        }
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(LogPipelineError::Config {
                field: "indices".to_owned(),
                reason: "index names must be distinct".to_owned(),
            });
        }

        if self.collaborator_timeout == Some(Duration::ZERO) {
            return Err(LogPipelineError::Config {
                field: "collaborator_timeout".to_owned(),
                reason: "use None to disable the timeout".to_owned(),
            });
        }

        Ok(())
    }

    /// 배치 분류 정책을 생성합니다.
    pub fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy::new(
            self.error_path_marker.clone(),
            self.error_marker_mode,
            self.apache_name_marker.clone(),
            self.indices.clone(),
        )
    }

    /// 알림 판정기를 생성합니다.
    pub fn alert_evaluator(&self) -> AlertEvaluator {
        AlertEvaluator::new(
            CriticalMatcher::new(&self.error_patterns),
            self.server_error_threshold,
        )
    }
}

/// 처리기 설정 빌더
#[derive(Default)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 치명적 패턴 목록을 설정합니다.
    pub fn error_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.error_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// 에러 로그 경로 조각을 설정합니다.
    pub fn error_path_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.error_path_marker = marker.into();
        self
    }

    /// 에러 로그 판별 방식을 설정합니다.
    pub fn error_marker_mode(mut self, mode: ErrorMarkerMode) -> Self {
        self.config.error_marker_mode = mode;
        self
    }

    /// Apache 파일 이름 조각을 설정합니다.
    pub fn apache_name_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.apache_name_marker = marker.into();
        self
    }

    /// `WARNING` 알림 임계 상태 코드를 설정합니다.
    pub fn server_error_threshold(mut self, status: u16) -> Self {
        self.config.server_error_threshold = status;
        self
    }

    /// 협력자 호출 타임아웃을 설정합니다.
    pub fn collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.config.collaborator_timeout = Some(timeout);
        self
    }

    /// 대상 인덱스 이름을 설정합니다.
    pub fn indices(mut self, indices: IndexNames) -> Self {
        self.config.indices = indices;
        self
    }

    /// 설정을 검증하고 `ProcessorConfig`를 생성합니다.
    pub fn build(self) -> Result<ProcessorConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
