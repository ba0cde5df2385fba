//! 배치 분류 정책
//!
//! 오브젝트 키(경로)로 배치 전체의 로그 계열과 대상 인덱스를 결정합니다.
//! 규칙은 고정된 우선순위로 평가됩니다.
//!
//! 1. 경로에 에러 로그 표식(기본 `/error/`)이 있으면 에러 로그
//! 2. 파일 이름에 Apache 표식(기본 `apachestyle.log`)이 있으면 Apache 액세스 로그
//! 3. 그 외는 표준 액세스 로그
//!
//! 키는 버킷 루트 기준 경로로 취급하므로 `error/app.log`도 `/error/app.log`로 검사합니다.

use std::fmt;

use logdrop_core::config::{IndicesConfig, MARKER_MODE_KEYWORD, MARKER_MODE_PATH};
use logdrop_core::types::LogFamily;

/// 에러 로그 판별 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMarkerMode {
    /// 경로에 디렉토리 조각이 포함되는지 검사
    #[default]
    PathFragment,
    /// 소문자 키에 `error`가 포함되는지 검사 (구버전 규칙)
    Keyword,
}

impl ErrorMarkerMode {
    /// 설정 문자열에서 변환합니다.
    pub fn from_config(s: &str) -> Option<Self> {
        match s {
            MARKER_MODE_PATH => Some(Self::PathFragment),
            MARKER_MODE_KEYWORD => Some(Self::Keyword),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorMarkerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathFragment => f.write_str(MARKER_MODE_PATH),
            Self::Keyword => f.write_str(MARKER_MODE_KEYWORD),
        }
    }
}

/// 계열별 대상 인덱스 이름
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNames {
    pub error: String,
    pub access: String,
    pub apache: String,
}

impl IndexNames {
    /// 계열에 해당하는 인덱스 이름
    pub fn for_family(&self, family: LogFamily) -> &str {
        match family {
            LogFamily::Error => &self.error,
            LogFamily::StandardAccess => &self.access,
            LogFamily::ApacheAccess => &self.apache,
        }
    }
}

impl Default for IndexNames {
    fn default() -> Self {
        Self::from(&IndicesConfig::default())
    }
}

impl From<&IndicesConfig> for IndexNames {
    fn from(config: &IndicesConfig) -> Self {
        Self {
            error: config.error.clone(),
            access: config.access.clone(),
            apache: config.apache.clone(),
        }
    }
}

/// 분류 결과: 계열과 대상 인덱스
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch<'a> {
    pub family: LogFamily,
    pub index: &'a str,
}

/// 배치 분류 정책
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    error_marker: String,
    marker_mode: ErrorMarkerMode,
    apache_marker: String,
    indices: IndexNames,
}

impl DispatchPolicy {
    /// 정책을 생성합니다.
    pub fn new(
        error_marker: impl Into<String>,
        marker_mode: ErrorMarkerMode,
        apache_marker: impl Into<String>,
        indices: IndexNames,
    ) -> Self {
        Self {
            error_marker: error_marker.into(),
            marker_mode,
            apache_marker: apache_marker.into(),
            indices,
        }
    }

    /// 오브젝트 경로로 계열과 인덱스를 선택합니다.
    pub fn select(&self, object_path: &str) -> Dispatch<'_> {
        let family = self.family_for(object_path);
        Dispatch {
            family,
            index: self.indices.for_family(family),
        }
    }

    /// 오브젝트 경로의 로그 계열
    pub fn family_for(&self, object_path: &str) -> LogFamily {
        if self.is_error_path(object_path) {
            LogFamily::Error
        } else if file_name(object_path).contains(self.apache_marker.as_str()) {
            LogFamily::ApacheAccess
        } else {
            LogFamily::StandardAccess
        }
    }

    /// 대상 인덱스 이름
    pub fn indices(&self) -> &IndexNames {
        &self.indices
    }

    fn is_error_path(&self, object_path: &str) -> bool {
        match self.marker_mode {
            ErrorMarkerMode::PathFragment => {
                if object_path.starts_with('/') {
                    object_path.contains(self.error_marker.as_str())
                } else {
                    format!("/{object_path}").contains(self.error_marker.as_str())
                }
            }
            ErrorMarkerMode::Keyword => object_path.to_lowercase().contains("error"),
        }
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::new(
            "/error/",
            ErrorMarkerMode::PathFragment,
            "apachestyle.log",
            IndexNames::default(),
        )
    }
}

fn file_name(object_path: &str) -> &str {
    object_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(object_path)
}
