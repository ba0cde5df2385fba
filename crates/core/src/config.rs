//! 설정 관리: logdrop.toml 파싱 및 런타임 설정
//!
//! [`LogdropConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGDROP_PROCESSOR_ERROR_PATTERNS='["fatal"]'` 형식)
//! 3. 설정 파일 (`logdrop.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logdrop_core::error::LogdropError> {
//! use logdrop_core::config::LogdropConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogdropConfig::load("logdrop.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogdropConfig::parse("[processor]\nerror_patterns = [\"fatal\"]")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogdropError};

/// 에러 로그 판별 방식: 디렉토리 경로 조각
pub const MARKER_MODE_PATH: &str = "path";
/// 에러 로그 판별 방식: 키워드 부분 문자열 (구버전 규칙)
pub const MARKER_MODE_KEYWORD: &str = "keyword";

/// logdrop 통합 설정
///
/// `logdrop.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogdropConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분류/알림 설정
    #[serde(default)]
    pub processor: ProcessorSection,
    /// 대상 인덱스 이름
    #[serde(default)]
    pub indices: IndicesConfig,
    /// 로컬 저장소 경로
    #[serde(default)]
    pub storage: StorageConfig,
}

impl LogdropConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogdropError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작하여 로드합니다.
    ///
    /// 설정 파일 없이도 CLI를 사용할 수 있도록 합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogdropError> {
        let path = path.as_ref();
        let mut config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogdropError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogdropError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogdropError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogdropError> {
        toml::from_str(toml_str).map_err(|e| {
            LogdropError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGDROP_{SECTION}_{FIELD}`
    /// 예: `LOGDROP_INDICES_ERROR=app-errors`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGDROP_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGDROP_GENERAL_LOG_FORMAT");

        // Processor
        override_json_list(
            &mut self.processor.error_patterns,
            "LOGDROP_PROCESSOR_ERROR_PATTERNS",
        );
        override_string(
            &mut self.processor.error_path_marker,
            "LOGDROP_PROCESSOR_ERROR_PATH_MARKER",
        );
        override_string(
            &mut self.processor.error_marker_mode,
            "LOGDROP_PROCESSOR_ERROR_MARKER_MODE",
        );
        override_string(
            &mut self.processor.apache_name_marker,
            "LOGDROP_PROCESSOR_APACHE_NAME_MARKER",
        );
        override_u16(
            &mut self.processor.server_error_threshold,
            "LOGDROP_PROCESSOR_SERVER_ERROR_THRESHOLD",
        );
        override_u64(
            &mut self.processor.collaborator_timeout_ms,
            "LOGDROP_PROCESSOR_COLLABORATOR_TIMEOUT_MS",
        );

        // Indices
        override_string(&mut self.indices.error, "LOGDROP_INDICES_ERROR");
        override_string(&mut self.indices.access, "LOGDROP_INDICES_ACCESS");
        override_string(&mut self.indices.apache, "LOGDROP_INDICES_APACHE");

        // Storage
        override_string(&mut self.storage.object_root, "LOGDROP_STORAGE_OBJECT_ROOT");
        override_string(&mut self.storage.index_dir, "LOGDROP_STORAGE_INDEX_DIR");
        override_string(
            &mut self.storage.alert_log_path,
            "LOGDROP_STORAGE_ALERT_LOG_PATH",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogdropError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        self.processor.validate()?;
        self.indices.validate()?;
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> LogdropError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 분류/알림 설정 (`[processor]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSection {
    /// 치명적 패턴 목록 (대소문자 무시 부분 문자열, 비어 있으면 CRITICAL 알림 없음)
    pub error_patterns: Vec<String>,
    /// 에러 로그 경로 조각
    pub error_path_marker: String,
    /// 에러 로그 판별 방식 (path, keyword)
    pub error_marker_mode: String,
    /// Apache 형식 파일 이름 조각
    pub apache_name_marker: String,
    /// 경고 알림을 발생시키는 최소 상태 코드
    pub server_error_threshold: u16,
    /// 인덱스/알림 호출 타임아웃 (밀리초, 0이면 비활성)
    pub collaborator_timeout_ms: u64,
}

impl Default for ProcessorSection {
    fn default() -> Self {
        Self {
            error_patterns: Vec::new(),
            error_path_marker: "/error/".to_owned(),
            error_marker_mode: MARKER_MODE_PATH.to_owned(),
            apache_name_marker: "apachestyle.log".to_owned(),
            server_error_threshold: 500,
            collaborator_timeout_ms: 0,
        }
    }
}

impl ProcessorSection {
    fn validate(&self) -> Result<(), LogdropError> {
        let valid_modes = [MARKER_MODE_PATH, MARKER_MODE_KEYWORD];
        if !valid_modes.contains(&self.error_marker_mode.as_str()) {
            return Err(invalid(
                "processor.error_marker_mode",
                format!("must be one of: {}", valid_modes.join(", ")),
            ));
        }

        if self.error_path_marker.is_empty() {
            return Err(invalid(
                "processor.error_path_marker",
                "marker must not be empty",
            ));
        }

        if self.apache_name_marker.is_empty() {
            return Err(invalid(
                "processor.apache_name_marker",
                "marker must not be empty",
            ));
        }

        if !(100..=599).contains(&self.server_error_threshold) {
            return Err(invalid(
                "processor.server_error_threshold",
                format!(
                    "must be an HTTP status between 100 and 599, got {}",
                    self.server_error_threshold
                ),
            ));
        }

        // 빈 패턴은 모든 메시지와 일치하므로 허용하지 않음
        if let Some(pos) = self.error_patterns.iter().position(|p| p.trim().is_empty()) {
            return Err(invalid(
                "processor.error_patterns",
                format!("pattern at position {pos} is blank"),
            ));
        }

        Ok(())
    }
}

/// 대상 인덱스 이름 (`[indices]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicesConfig {
    /// 에러 로그 인덱스
    pub error: String,
    /// 표준 액세스 로그 인덱스
    pub access: String,
    /// Apache 액세스 로그 인덱스
    pub apache: String,
}

impl Default for IndicesConfig {
    fn default() -> Self {
        Self {
            error: "error-logs".to_owned(),
            access: "access-logs".to_owned(),
            apache: "apache-access-logs".to_owned(),
        }
    }
}

impl IndicesConfig {
    /// 모든 인덱스 이름
    pub fn all(&self) -> [&str; 3] {
        [&self.error, &self.access, &self.apache]
    }

    fn validate(&self) -> Result<(), LogdropError> {
        for (field, name) in [
            ("indices.error", &self.error),
            ("indices.access", &self.access),
            ("indices.apache", &self.apache),
        ] {
            if name.trim().is_empty() {
                return Err(invalid(field, "index name must not be empty"));
            }
            // 인덱스 이름은 파일 이름으로도 쓰이므로 경로 구분자를 허용하지 않음
            if name.contains('/') || name.contains('\\') {
                return Err(invalid(field, "index name must not contain path separators"));
            }
        }

        let names = self.all();
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(invalid(
                    "indices",
                    format!("index name '{name}' is used more than once"),
                ));
            }
        }

        Ok(())
    }
}

/// 로컬 저장소 설정 (`[storage]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 오브젝트 루트 디렉토리 (`<root>/<bucket>/<key>`)
    pub object_root: String,
    /// 인덱스 출력 디렉토리
    pub index_dir: String,
    /// 알림 로그 파일 경로 (비어 있으면 tracing 출력만)
    pub alert_log_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            object_root: "./data/objects".to_owned(),
            index_dir: "./data/indices".to_owned(),
            alert_log_path: String::new(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

/// JSON 배열(`["a","b"]`)을 우선 시도하고, 실패하면 쉼표 구분 목록으로 해석합니다.
fn override_json_list(target: &mut Vec<String>, env_key: &str) {
    let Ok(val) = std::env::var(env_key) else {
        return;
    };

    let trimmed = val.trim();
    if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(trimmed) {
            Ok(parsed) => *target = parsed,
            Err(e) => warn!(
                env_key,
                value = val.as_str(),
                error = %e,
                "failed to parse JSON list from env var, ignoring"
            ),
        }
        return;
    }

    *target = trimmed
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = LogdropConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert!(config.processor.error_patterns.is_empty());
        assert_eq!(config.processor.error_path_marker, "/error/");
        assert_eq!(config.processor.server_error_threshold, 500);
        assert_eq!(config.indices.error, "error-logs");
        assert_eq!(config.indices.access, "access-logs");
        assert_eq!(config.indices.apache, "apache-access-logs");
    }

    #[test]
    fn default_config_passes_validation() {
        LogdropConfig::default().validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = LogdropConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.processor.error_marker_mode, MARKER_MODE_PATH);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[processor]
error_patterns = ["panic", "oom"]

[indices]
error = "app-errors"
"#;
        let config = LogdropConfig::parse(toml).unwrap();
        assert_eq!(config.processor.error_patterns, vec!["panic", "oom"]);
        // 나머지는 기본값 유지
        assert_eq!(config.processor.apache_name_marker, "apachestyle.log");
        assert_eq!(config.indices.error, "app-errors");
        assert_eq!(config.indices.access, "access-logs");
    }

    #[test]
    fn from_str_full_toml() {
        let toml = r#"
[general]
log_level = "debug"
log_format = "pretty"

[processor]
error_patterns = ["fatal"]
error_path_marker = "/errors/"
error_marker_mode = "keyword"
apache_name_marker = "combined.log"
server_error_threshold = 502
collaborator_timeout_ms = 1500

[indices]
error = "e"
access = "a"
apache = "ap"

[storage]
object_root = "/srv/objects"
index_dir = "/srv/indices"
alert_log_path = "/srv/alerts.jsonl"
"#;
        let config = LogdropConfig::parse(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.processor.error_marker_mode, MARKER_MODE_KEYWORD);
        assert_eq!(config.processor.server_error_threshold, 502);
        assert_eq!(config.processor.collaborator_timeout_ms, 1500);
        assert_eq!(config.indices.all(), ["e", "a", "ap"]);
        assert_eq!(config.storage.alert_log_path, "/srv/alerts.jsonl");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let err = LogdropConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            LogdropError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = LogdropConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = LogdropConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_unknown_marker_mode() {
        let mut config = LogdropConfig::default();
        config.processor.error_marker_mode = "regex".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("error_marker_mode"));
    }

    #[test]
    fn validate_rejects_empty_error_marker() {
        let mut config = LogdropConfig::default();
        config.processor.error_path_marker = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("error_path_marker"));
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let mut config = LogdropConfig::default();
        config.processor.server_error_threshold = 600;
        assert!(config.validate().is_err());

        config.processor.server_error_threshold = 99;
        assert!(config.validate().is_err());

        config.processor.server_error_threshold = 599;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_blank_pattern() {
        let mut config = LogdropConfig::default();
        config.processor.error_patterns = vec!["fatal".to_owned(), "  ".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn validate_accepts_empty_pattern_list() {
        let mut config = LogdropConfig::default();
        config.processor.error_patterns.clear();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_index_name() {
        let mut config = LogdropConfig::default();
        config.indices.access = " ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("indices.access"));
    }

    #[test]
    fn validate_rejects_index_with_separator() {
        let mut config = LogdropConfig::default();
        config.indices.apache = "../escape".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_index_names() {
        let mut config = LogdropConfig::default();
        config.indices.apache = "access-logs".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_LOGDROP_STR", "overridden") };
        override_string(&mut val, "TEST_LOGDROP_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_LOGDROP_STR") };
    }

    #[test]
    #[serial]
    fn env_override_u16_invalid_keeps_original() {
        let mut val = 500u16;
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_LOGDROP_U16_BAD", "five hundred") };
        override_u16(&mut val, "TEST_LOGDROP_U16_BAD");
        assert_eq!(val, 500); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_LOGDROP_U16_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_json_list() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_LOGDROP_JSON", r#"["panic", "Out Of Memory"]"#) };
        override_json_list(&mut val, "TEST_LOGDROP_JSON");
        assert_eq!(val, vec!["panic", "Out Of Memory"]);
        unsafe { std::env::remove_var("TEST_LOGDROP_JSON") };
    }

    #[test]
    #[serial]
    fn env_override_json_list_csv_fallback() {
        let mut val = Vec::new();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_LOGDROP_CSV", "x, y,,z") };
        override_json_list(&mut val, "TEST_LOGDROP_CSV");
        assert_eq!(val, vec!["x", "y", "z"]);
        unsafe { std::env::remove_var("TEST_LOGDROP_CSV") };
    }

    #[test]
    #[serial]
    fn env_override_json_list_malformed_keeps_original() {
        let mut val = vec!["fatal".to_owned()];
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_LOGDROP_JSON_BAD", "[\"unterminated") };
        override_json_list(&mut val, "TEST_LOGDROP_JSON_BAD");
        assert_eq!(val, vec!["fatal"]);
        unsafe { std::env::remove_var("TEST_LOGDROP_JSON_BAD") };
    }

    #[test]
    #[serial]
    fn apply_env_overrides_reads_section_keys() {
        let mut config = LogdropConfig::default();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe {
            std::env::set_var("LOGDROP_INDICES_ERROR", "ops-errors");
            std::env::set_var("LOGDROP_PROCESSOR_ERROR_PATTERNS", r#"["panic"]"#);
        }
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("LOGDROP_INDICES_ERROR");
            std::env::remove_var("LOGDROP_PROCESSOR_ERROR_PATTERNS");
        }
        assert_eq!(config.indices.error, "ops-errors");
        assert_eq!(config.processor.error_patterns, vec!["panic"]);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = LogdropConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = LogdropConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(
            config.processor.error_patterns,
            parsed.processor.error_patterns
        );
        assert_eq!(config.indices.apache, parsed.indices.apache);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = LogdropConfig::from_file("/nonexistent/path/logdrop.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LogdropError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_or_default_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogdropConfig::load_or_default(dir.path().join("missing.toml"))
            .await
            .unwrap();
        assert_eq!(config.indices.error, "error-logs");
    }

    #[tokio::test]
    async fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logdrop.toml");
        tokio::fs::write(&path, "[general]\nlog_level = \"warn\"\n")
            .await
            .unwrap();
        let config = LogdropConfig::from_file(&path).await.unwrap();
        assert_eq!(config.general.log_level, "warn");
    }
}
