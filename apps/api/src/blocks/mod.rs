pub mod handlers;
pub mod repo;

/// Block keys are referenced from templates: lowercase letters, digits, `-` and `_`.
pub fn is_valid_block_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_keys() {
        assert!(is_valid_block_key("footer-notice"));
        assert!(is_valid_block_key("about_us"));
        assert!(!is_valid_block_key(""));
        assert!(!is_valid_block_key("About"));
        assert!(!is_valid_block_key("a b"));
    }
}
