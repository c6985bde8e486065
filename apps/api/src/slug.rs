use uuid::Uuid;

use crate::errors::AppError;
use crate::i18n::{Lang, Localized};

const MAX_SLUG_LEN: usize = 80;

/// Lowercase ASCII words joined by single hyphens. Non-ASCII text (Japanese
/// titles, for instance) contributes nothing.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
}

/// Uses the caller's slug when given (must already be valid), otherwise derives
/// one from the English then Japanese name, then from a random suffix.
pub fn resolve_slug(explicit: Option<&str>, name: &Localized) -> Result<String, AppError> {
    if let Some(slug) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        if !is_valid_slug(slug) {
            return Err(AppError::Validation(format!(
                "Invalid slug '{slug}': use lowercase letters, digits and single hyphens"
            )));
        }
        return Ok(slug.to_string());
    }

    for lang in [Lang::En, Lang::SOURCE] {
        let derived = slugify(name.get(lang));
        if !derived.is_empty() {
            return Ok(derived);
        }
    }

    let id = Uuid::new_v4().simple().to_string();
    Ok(format!("post-{}", &id[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Best Ramen in Tokyo!! 2024 "), "best-ramen-in-tokyo-2024");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify("東京ラーメン"), "");
        assert_eq!(slugify("Tokyo 東京 Guide"), "tokyo-guide");
    }

    #[test]
    fn test_slugify_caps_length() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("tokyo-night-2"));
        assert!(!is_valid_slug("Tokyo"));
        assert!(!is_valid_slug("-x"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_resolve_prefers_english_then_source_then_random() {
        let mut name = Localized::source("東京");
        assert!(resolve_slug(None, &name).unwrap().starts_with("post-"));

        name.set(Lang::En, "Tokyo");
        assert_eq!(resolve_slug(None, &name).unwrap(), "tokyo");

        assert_eq!(resolve_slug(Some("custom"), &name).unwrap(), "custom");
        assert!(resolve_slug(Some("Bad Slug"), &name).is_err());
    }
}
