//! Korean phone number formatting.

/// Digits of `value` regrouped with dashes: `010-1234-5678` for 11-digit
/// mobile numbers, `011-123-4567` for 10-digit legacy mobile prefixes.
/// Longer or unrecognized inputs are grouped 3-4-4 (plus any overflow) or
/// 3-3-rest; fewer than ten digits come back bare.
#[must_use]
pub fn format_korean(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let len = digits.len();
    if len == 0 {
        return String::new();
    }
    if len == 11 && digits.starts_with("010") {
        return format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]);
    }
    if len == 10 && is_legacy_mobile(&digits) {
        return format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]);
    }
    if len >= 11 {
        let mut out = format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..11]);
        if len > 11 {
            out.push('-');
            out.push_str(&digits[11..]);
        }
        return out;
    }
    if len >= 10 {
        return format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]);
    }
    digits
}

fn is_legacy_mobile(digits: &str) -> bool {
    digits.starts_with("01") && digits.as_bytes().get(2).is_some_and(|d| b"16978".contains(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_mobile_numbers() {
        assert_eq!(format_korean("01012345678"), "010-1234-5678");
        assert_eq!(format_korean("010 1234 5678"), "010-1234-5678");
        assert_eq!(format_korean("0111234567"), "011-123-4567");
        assert_eq!(format_korean("019-123-4567"), "019-123-4567");
    }

    #[test]
    fn falls_back_to_generic_groupings() {
        assert_eq!(format_korean("0212345678"), "021-234-5678");
        assert_eq!(format_korean("02123456789"), "021-2345-6789");
        assert_eq!(format_korean("0101234567890"), "010-1234-5678-90");
        assert_eq!(format_korean("12345"), "12345");
        assert_eq!(format_korean("no digits"), "");
    }
}
