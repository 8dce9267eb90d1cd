//! 숫자 표시 유틸리티.
//!
//! 리포트 페이지와 같은 형식(천 단위 쉼표, 부호 있는 등락률)으로 출력합니다.

use rust_decimal::Decimal;

/// 천 단위 쉼표를 넣어 정수를 표시합니다.
///
/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 등락률을 부호와 함께 소수 둘째 자리까지 표시합니다.
///
/// `1.5` -> `"+1.50%"`, `-2.3` -> `"-2.30%"`
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp(2);
    if rounded > Decimal::ZERO {
        format!("+{:.2}%", rounded)
    } else {
        format!("{:.2}%", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-45_000), "-45,000");
        assert_eq!(format_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(dec!(1.5)), "+1.50%");
        assert_eq!(format_rate(dec!(-2.3)), "-2.30%");
        assert_eq!(format_rate(Decimal::ZERO), "0.00%");
    }
}
