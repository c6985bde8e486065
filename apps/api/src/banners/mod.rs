pub mod handlers;
pub mod repo;

pub const PLACEMENTS: [&str; 4] = ["header", "sidebar", "footer", "in_article"];

pub fn is_valid_placement(placement: &str) -> bool {
    PLACEMENTS.contains(&placement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placements() {
        assert!(is_valid_placement("in_article"));
        assert!(!is_valid_placement("popup"));
        assert!(!is_valid_placement("Header"));
    }
}
