//! Theme validation.

use crate::errors::AppError;
use crate::models::tenant::Theme;

/// `#rgb` or `#rrggbb`, case-insensitive.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn validate_theme(theme: &Theme) -> Result<(), AppError> {
    let colors = [
        ("primary_color", &theme.primary_color),
        ("secondary_color", &theme.secondary_color),
        ("accent_color", &theme.accent_color),
        ("background_color", &theme.background_color),
        ("text_color", &theme.text_color),
    ];
    for (field, value) in colors {
        if !is_hex_color(value) {
            return Err(AppError::Validation(format!(
                "{field} must be a hex color like #fff or #1a1a1a, got '{value}'"
            )));
        }
    }

    for (i, item) in theme.menu.iter().enumerate() {
        if item.url.trim().is_empty() {
            return Err(AppError::Validation(format!("menu[{i}].url is required")));
        }
        if item.label.is_empty() {
            return Err(AppError::Validation(format!("menu[{i}].label is required")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localized;
    use crate::models::tenant::MenuItem;

    #[test]
    fn test_hex_colors() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#1A1a1a"));
        assert!(!is_hex_color("fff"));
        assert!(!is_hex_color("#ffff"));
        assert!(!is_hex_color("#ggg"));
        assert!(!is_hex_color("red"));
    }

    #[test]
    fn test_default_theme_is_valid() {
        assert!(validate_theme(&Theme::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_color_and_menu() {
        let mut theme = Theme {
            accent_color: "blue".into(),
            ..Theme::default()
        };
        assert!(validate_theme(&theme).is_err());

        theme.accent_color = "#00f".into();
        theme.menu.push(MenuItem {
            label: Localized::source("ホーム"),
            url: String::new(),
        });
        assert!(validate_theme(&theme).is_err());
    }

    #[test]
    fn test_partial_theme_json_fills_defaults() {
        let theme: Theme = serde_json::from_str(r##"{"primary_color":"#000"}"##).unwrap();
        assert_eq!(theme.primary_color, "#000");
        assert_eq!(theme.background_color, Theme::default().background_color);
        assert!(validate_theme(&theme).is_ok());
    }
}
