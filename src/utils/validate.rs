/// Passenger name: at least 2 characters after trimming.
pub fn valid_passenger_name(name: &str) -> bool {
    name.trim().chars().count() >= 2
}

/// Passenger phone: exactly 10-15 ASCII digits after trimming,
/// no separators or country-code prefix.
pub fn valid_phone(phone: &str) -> bool {
    let digits = phone.trim();
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(valid_passenger_name("Abebe Kebede"));
        assert!(valid_passenger_name("  Yo  "));
        assert!(!valid_passenger_name("A"));
        assert!(!valid_passenger_name("   "));
        assert!(!valid_passenger_name(""));
    }

    #[test]
    fn test_phone_length_boundaries() {
        assert!(!valid_phone("123456789")); // 9 digits
        assert!(valid_phone("1234567890")); // 10
        assert!(valid_phone("123456789012345")); // 15
        assert!(!valid_phone("1234567890123456")); // 16
    }

    #[test]
    fn test_phone_rejects_non_digits() {
        assert!(!valid_phone("09111+22334"));
        assert!(!valid_phone("0911 122 334"));
        assert!(!valid_phone("phone-number"));
        assert!(valid_phone(" 0911122334 ")); // surrounding whitespace trimmed
    }
}
