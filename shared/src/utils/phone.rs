//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Mainland China mobile number without country code
static CHINA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1[3-9]\d{9}$").unwrap()
});

// International phone number (E.164)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number can receive SMS verification codes
///
/// Accepts E.164 numbers and bare mainland China mobile numbers, after
/// normalization.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    CHINA_MOBILE_REGEX.is_match(&normalized) || E164_REGEX.is_match(&normalized)
}

/// Mask a phone number for logging, keeping only the last four digits
///
/// ```
/// use nb_shared::phone::mask_phone_number;
/// assert_eq!(mask_phone_number("+14155552671"), "+*******2671");
/// ```
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() <= 4 {
        return "*".repeat(normalized.len());
    }

    let visible = &normalized[normalized.len() - 4..];
    let masked_count = normalized.len() - 4;
    if normalized.starts_with('+') {
        format!("+{}{}", "*".repeat(masked_count - 1), visible)
    } else {
        format!("{}{}", "*".repeat(masked_count), visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("138-1234-5678"), "13812345678");
        assert_eq!(normalize_phone_number("+86 138 1234 5678"), "+8613812345678");
        assert_eq!(normalize_phone_number("(138) 1234-5678"), "13812345678");
    }

    #[test]
    fn test_is_valid_phone_number() {
        assert!(is_valid_phone_number("13812345678"));
        assert!(is_valid_phone_number("+8613812345678"));
        assert!(is_valid_phone_number("+14155552671"));
        assert!(is_valid_phone_number("+44 20 7183 8750"));
        assert!(!is_valid_phone_number("12812345678")); // Invalid prefix
        assert!(!is_valid_phone_number("+0123456789")); // Invalid country code
        assert!(!is_valid_phone_number("+123"));
        assert!(!is_valid_phone_number("user@example.com"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+14155552671"), "+*******2671");
        assert_eq!(mask_phone_number("13812345678"), "*******5678");
        assert_eq!(mask_phone_number("123"), "***");
        assert_eq!(mask_phone_number("1234"), "****");
    }
}
