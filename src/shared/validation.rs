use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Vehicle number plates: letters, digits, spaces and hyphens
    /// - Valid: "UBA 123X", "KCA-456B", "uag123"
    /// - Invalid: "", "UBA_123", "#123"
    pub static ref NUMBER_PLATE_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9]+(?:[ -][A-Za-z0-9]+)*$").unwrap();

    /// Contact numbers: optional leading +, then digits with optional spaces or hyphens
    pub static ref CONTACT_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 -]{5,19}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_plate_regex_valid() {
        assert!(NUMBER_PLATE_REGEX.is_match("UBA 123X"));
        assert!(NUMBER_PLATE_REGEX.is_match("KCA-456B"));
        assert!(NUMBER_PLATE_REGEX.is_match("uag123"));
    }

    #[test]
    fn test_number_plate_regex_invalid() {
        assert!(!NUMBER_PLATE_REGEX.is_match(""));
        assert!(!NUMBER_PLATE_REGEX.is_match("UBA_123"));
        assert!(!NUMBER_PLATE_REGEX.is_match(" UBA"));
        assert!(!NUMBER_PLATE_REGEX.is_match("UBA  123"));
    }

    #[test]
    fn test_contact_regex() {
        assert!(CONTACT_REGEX.is_match("+256 700 123456"));
        assert!(CONTACT_REGEX.is_match("0700-123-456"));
        assert!(!CONTACT_REGEX.is_match("call me"));
        assert!(!CONTACT_REGEX.is_match("123"));
    }
}
