use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::ai::prompts::{
    ARTICLE_DRAFT_PROMPT, ARTICLE_DRAFT_SYSTEM, DEFAULT_TONE, IMAGE_STYLE_PREFIX,
};
use crate::ai::{ArticleDraft, DEFAULT_IMAGE_SIZE, IMAGE_SIZES};
use crate::errors::AppError;
use crate::media::{store_media, NewMedia};
use crate::models::media::MediaFileRow;
use crate::routes::params::TenantQuery;
use crate::slug::slugify;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateArticleRequest {
    pub topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub size: Option<String>,
    pub alt_text: Option<String>,
}

pub fn build_article_prompt(req: &GenerateArticleRequest) -> String {
    let keywords = if req.keywords.is_empty() {
        "(none)".to_string()
    } else {
        req.keywords.join(", ")
    };
    ARTICLE_DRAFT_PROMPT
        .replace("{topic}", req.topic.trim())
        .replace("{keywords}", &keywords)
        .replace("{tone}", req.tone.as_deref().unwrap_or(DEFAULT_TONE))
}

/// POST /api/admin/ai/generate-article
///
/// Returns a draft only; nothing is saved.
pub async fn generate_article(
    State(state): State<AppState>,
    Json(req): Json<GenerateArticleRequest>,
) -> Result<Json<ArticleDraft>, AppError> {
    if req.topic.trim().is_empty() {
        return Err(AppError::Validation("topic is required".to_string()));
    }
    let draft: ArticleDraft = state
        .llm
        .call_json(&build_article_prompt(&req), ARTICLE_DRAFT_SYSTEM)
        .await?;
    draft.validate()?;
    info!("Generated article draft for topic '{}'", req.topic.trim());
    Ok(Json(draft))
}

/// POST /api/admin/ai/generate-image
///
/// Generates a PNG, stores it in the tenant's media library and returns the row.
pub async fn generate_image(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(req): Json<GenerateImageRequest>,
) -> Result<(StatusCode, Json<MediaFileRow>), AppError> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation("prompt is required".to_string()));
    }
    let size = req.size.as_deref().unwrap_or(DEFAULT_IMAGE_SIZE);
    if !IMAGE_SIZES.contains(&size) {
        return Err(AppError::Validation(format!(
            "size must be one of {}",
            IMAGE_SIZES.join(", ")
        )));
    }

    let bytes = state
        .llm
        .generate_image(&format!("{IMAGE_STYLE_PREFIX}{prompt}"), size)
        .await?;

    let stem = slugify(prompt);
    let file_name = if stem.is_empty() {
        "generated.png".to_string()
    } else {
        format!("{}.png", &stem[..stem.len().min(40)].trim_end_matches('-'))
    };

    let saved = store_media(
        &state,
        q.tenant_id,
        NewMedia {
            file_name,
            content_type: "image/png".to_string(),
            bytes: bytes.into(),
            alt_text: req.alt_text.or_else(|| Some(prompt.to_string())),
        },
    )
    .await?;
    info!("Stored generated image {} for tenant {}", saved.id, saved.tenant_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_prompt_substitutes_placeholders() {
        let req = GenerateArticleRequest {
            topic: " 京都の朝ごはん ".into(),
            keywords: vec!["湯豆腐".into(), "朝市".into()],
            tone: None,
        };
        let prompt = build_article_prompt(&req);
        assert!(prompt.contains("Topic: 京都の朝ごはん\n"));
        assert!(prompt.contains("Keywords to cover: 湯豆腐, 朝市"));
        assert!(prompt.contains(DEFAULT_TONE));
        assert!(!prompt.contains("{topic}"));
    }

    #[test]
    fn test_article_prompt_without_keywords() {
        let req = GenerateArticleRequest {
            topic: "Ramen".into(),
            keywords: vec![],
            tone: Some("playful".into()),
        };
        let prompt = build_article_prompt(&req);
        assert!(prompt.contains("Keywords to cover: (none)"));
        assert!(prompt.contains("Tone: playful"));
    }
}
