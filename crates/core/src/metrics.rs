//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 처리기는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 기록은 아무 효과가 없습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logdrop_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logdrop_core::metrics::LINES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 로그 계열 레이블 키 (error, standard_access, apache_access)
pub const LABEL_FAMILY: &str = "family";

/// 심각도 레이블 키 (info, warning, error, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 처리 메트릭 ────────────────────────────────────────────────────

/// 처리한 (공백이 아닌) 라인 수 (counter, label: family)
pub const LINES_TOTAL: &str = "logdrop_lines_total";

/// 레코드로 파싱된 라인 수 (counter, label: family)
pub const RECORDS_PARSED_TOTAL: &str = "logdrop_records_parsed_total";

/// 거부된 라인 수 (counter, label: family)
pub const LINES_REJECTED_TOTAL: &str = "logdrop_lines_rejected_total";

/// 인덱스 upsert 실패 수 (counter)
pub const INDEX_FAILURES_TOTAL: &str = "logdrop_index_failures_total";

/// 발행 시도한 알림 수 (counter, label: severity, result)
pub const ALERTS_TOTAL: &str = "logdrop_alerts_total";

/// 오브젝트 하나의 처리 시간 (histogram, 초)
pub const BATCH_DURATION_SECONDS: &str = "logdrop_batch_duration_seconds";

/// 실패한 호출 수 (counter)
pub const INVOCATION_FAILURES_TOTAL: &str = "logdrop_invocation_failures_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 레코더를 설치하는 쪽에서 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(LINES_TOTAL, "Total non-blank lines read from objects");
    describe_counter!(
        RECORDS_PARSED_TOTAL,
        "Lines successfully classified into records"
    );
    describe_counter!(
        LINES_REJECTED_TOTAL,
        "Lines rejected by the family classifier"
    );
    describe_counter!(INDEX_FAILURES_TOTAL, "Failed index upserts");
    describe_counter!(ALERTS_TOTAL, "Alerts handed to the alert sink");
    describe_histogram!(
        BATCH_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Wall time spent processing one object"
    );
    describe_counter!(
        INVOCATION_FAILURES_TOTAL,
        "Invocations aborted by an upstream failure"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        LINES_TOTAL,
        RECORDS_PARSED_TOTAL,
        LINES_REJECTED_TOTAL,
        INDEX_FAILURES_TOTAL,
        ALERTS_TOTAL,
        BATCH_DURATION_SECONDS,
        INVOCATION_FAILURES_TOTAL,
    ];

    #[test]
    fn all_metrics_start_with_logdrop_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("logdrop_"),
                "Metric '{}' does not start with 'logdrop_' prefix",
                name
            );
        }
    }

    #[test]
    fn metric_names_are_unique() {
        for (i, name) in ALL_METRIC_NAMES.iter().enumerate() {
            assert!(
                !ALL_METRIC_NAMES[i + 1..].contains(name),
                "Metric '{}' is defined twice",
                name
            );
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        // 레코더 없이도 패닉하지 않아야 함
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_FAMILY, LABEL_SEVERITY, LABEL_RESULT] {
            assert_eq!(label.to_lowercase(), label);
        }
    }
}
