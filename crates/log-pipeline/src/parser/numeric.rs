//! 최선 노력 숫자 파싱
//!
//! 필드 앞부분의 숫자만 읽습니다. 앞 공백은 무시하고, 숫자 뒤의 문자는 버립니다.
//! 숫자로 시작하지 않으면 `None`입니다.
//!
//! ```text
//! "200"   -> 200
//! " 200x" -> 200
//! "abc"   -> None
//! ```

/// 앞부분의 부호 있는 10진 정수를 읽습니다.
pub fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = count_digits(&s[sign_len..]);
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// 앞부분의 음이 아닌 정수를 읽습니다. 음수이거나 범위를 넘으면 `None`입니다.
pub fn leading_unsigned<T: TryFrom<i64>>(raw: &str) -> Option<T> {
    leading_int(raw).and_then(|v| T::try_from(v).ok())
}

/// 앞부분의 10진 실수를 읽습니다 (`1.5`, `.5`, `2e3`).
///
/// 유한하지 않은 값은 `None`입니다.
pub fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['+', '-']));

    let int_digits = count_digits(&s[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&s[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // 지수는 뒤에 숫자가 있을 때만 포함
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&s[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn count_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
