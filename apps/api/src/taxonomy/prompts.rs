// Prompt constants for tag extraction.

pub const TAG_EXTRACT_SYSTEM: &str = "You are an editor tagging articles for an online \
    magazine. You MUST respond with valid JSON only: a JSON array of strings. \
    Do NOT use markdown code fences. Do NOT include explanations.";

/// Replace `{max_tags}` and `{text}` before sending.
pub const TAG_EXTRACT_PROMPT: &str = r#"Suggest up to {max_tags} short topic tags for the article below.
Tags must be written in the same language as the article, one to three words each,
and describe places, dishes, activities or themes a reader would browse by.

Return a JSON array of strings, for example: ["ラーメン", "新宿", "深夜営業"]

Article:
{text}"#;
