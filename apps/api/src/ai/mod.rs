//! AI-assisted authoring: article drafts and generated images.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Source-language draft returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub meta_description: String,
}

impl ArticleDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(AppError::Llm(
                "Generated draft is missing a title or content".to_string(),
            ));
        }
        Ok(())
    }
}

pub const IMAGE_SIZES: [&str; 3] = ["1024x1024", "1792x1024", "1024x1792"];
pub const DEFAULT_IMAGE_SIZE: &str = "1792x1024";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_parses_with_optional_fields_missing() {
        let draft: ArticleDraft =
            serde_json::from_str(r#"{"title":"京都の朝","content":"<p>静か</p>"}"#).unwrap();
        assert!(draft.excerpt.is_empty());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_empty_draft_is_rejected() {
        let draft = ArticleDraft {
            title: " ".into(),
            excerpt: String::new(),
            content: "<p>x</p>".into(),
            meta_description: String::new(),
        };
        assert!(draft.validate().is_err());
    }
}
