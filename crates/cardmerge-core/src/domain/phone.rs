/// Keeps only the ASCII digits of a phone value.
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_phone;

    #[test]
    fn normalize_phone_strips_formatting() {
        assert_eq!(normalize_phone("(555) 1234"), "5551234");
        assert_eq!(normalize_phone("555-1234"), "5551234");
    }

    #[test]
    fn normalize_phone_drops_plus_and_extension_markers() {
        assert_eq!(normalize_phone("+1 415.555.1212 x89"), "1415555121289");
    }

    #[test]
    fn normalize_phone_empty_when_no_digits() {
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("n/a"), "");
    }

    #[test]
    fn normalize_phone_ignores_non_ascii_digits() {
        assert_eq!(normalize_phone("٥٥٥ 12"), "12");
    }
}
