//! 치명적 조건 판정
//!
//! 메시지에 설정된 패턴 중 하나라도 (대소문자 무시) 포함되면 치명적입니다.
//! 패턴 목록이 비어 있으면 항상 `false`입니다.

/// 메시지가 치명적인지 판정합니다.
///
/// 순수 함수이며 실패하지 않습니다.
pub fn is_critical<P: AsRef<str>>(message: &str, patterns: &[P]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let message = message.to_lowercase();
    patterns
        .iter()
        .any(|p| message.contains(&p.as_ref().to_lowercase()))
}

/// 미리 소문자로 변환한 패턴 집합
///
/// 라인마다 패턴을 다시 변환하지 않도록 처리기에서 사용합니다.
#[derive(Debug, Clone, Default)]
pub struct CriticalMatcher {
    patterns: Vec<String>,
}

impl CriticalMatcher {
    /// 패턴 목록으로 생성합니다.
    pub fn new<P: AsRef<str>>(patterns: &[P]) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_lowercase()).collect(),
        }
    }

    /// 메시지와 일치하는 첫 번째 패턴을 반환합니다.
    pub fn first_match(&self, message: &str) -> Option<&str> {
        if self.patterns.is_empty() {
            return None;
        }
        let message = message.to_lowercase();
        self.patterns
            .iter()
            .find(|p| message.contains(p.as_str()))
            .map(String::as_str)
    }

    /// 메시지가 치명적인지 판정합니다.
    pub fn matches(&self, message: &str) -> bool {
        self.first_match(message).is_some()
    }

    /// 등록된 패턴 수
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// 패턴이 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
