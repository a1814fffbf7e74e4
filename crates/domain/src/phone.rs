/// Normalizes a free-text phone number into an international `+`-prefixed
/// identifier. Returns `None` when no rule applies:
/// - already `+`-prefixed with at least 8 digits: unchanged
/// - `00`-prefixed: `00` replaced with `+`
/// - exactly 9 digits: the default country code is prepended
/// - 10 or more digits: assumed international, `+` prepended
pub fn normalize_e164(input: &str, default_country_code: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if let Some(rest) = cleaned.strip_prefix('+') {
        if rest.len() >= 8 && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Some(cleaned);
        }
        return None;
    }
    if cleaned.bytes().any(|b| !b.is_ascii_digit()) {
        return None;
    }
    if let Some(rest) = cleaned.strip_prefix("00") {
        if rest.len() >= 8 {
            return Some(format!("+{}", rest));
        }
        return None;
    }
    match cleaned.len() {
        9 => Some(format!("+{}{}", default_country_code, cleaned)),
        n if n >= 10 => Some(format!("+{}", cleaned)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_normalizes_national_numbers_with_default_country_code() {
        assert_eq!(
            normalize_e164("612345678", "34"),
            Some("+34612345678".to_string())
        );
        assert_eq!(
            normalize_e164("612 345 678", "34"),
            Some("+34612345678".to_string())
        );
    }

    #[test]
    fn it_rewrites_double_zero_prefixes() {
        assert_eq!(
            normalize_e164("0034612345678", "34"),
            Some("+34612345678".to_string())
        );
    }

    #[test]
    fn it_keeps_plus_prefixed_numbers() {
        assert_eq!(
            normalize_e164("+1 650 555 0100", "34"),
            Some("+16505550100".to_string())
        );
        assert_eq!(
            normalize_e164("+34-612-345-678", "34"),
            Some("+34612345678".to_string())
        );
    }

    #[test]
    fn it_assumes_long_numbers_are_international() {
        assert_eq!(
            normalize_e164("4915123456789", "34"),
            Some("+4915123456789".to_string())
        );
    }

    #[test]
    fn it_rejects_numbers_with_no_matching_rule() {
        for input in &["abc", "", "12345", "+1234567", "00123456", "6123+45678"] {
            assert_eq!(normalize_e164(input, "34"), None);
        }
    }
}
