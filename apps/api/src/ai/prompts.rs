// Prompt constants for AI-assisted authoring.

pub const ARTICLE_DRAFT_SYSTEM: &str = "You are a staff writer for a Japanese online \
    magazine. You write engaging, accurate articles in natural Japanese. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace `{topic}`, `{keywords}` and `{tone}` before sending.
pub const ARTICLE_DRAFT_PROMPT: &str = r#"Write an article draft in Japanese.

Topic: {topic}
Keywords to cover: {keywords}
Tone: {tone}

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "記事タイトル",
  "excerpt": "一、二文の要約",
  "content": "<h2>見出し</h2><p>本文</p>",
  "meta_description": "検索結果に表示される120文字以内の説明"
}

Rules:
- content is HTML using only <h2>, <h3>, <p>, <ul>, <ol>, <li>, <strong>, <em> and <a>.
- Use at least three <h2> sections; add <h3> subsections where useful.
- Do not invent specific prices, addresses or opening hours."#;

pub const DEFAULT_TONE: &str = "friendly and informative";

/// Prefix for image prompts so results fit an editorial layout.
pub const IMAGE_STYLE_PREFIX: &str =
    "Editorial photograph for a magazine article, natural light, no text or watermarks. ";
