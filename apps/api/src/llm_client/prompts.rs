// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Appended to prompts whose input may contain HTML markup.
pub const PRESERVE_HTML_INSTRUCTION: &str = "\
    The text may contain HTML. Keep every tag and attribute exactly as it is \
    (including id, class, href and src values) and translate only the human-readable text \
    between tags. Do not add, remove or reorder tags.";
