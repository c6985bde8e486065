use crate::i18n::Lang;
use crate::llm_client::prompts::PRESERVE_HTML_INSTRUCTION;
use crate::translation::TextKind;

pub const TRANSLATION_SYSTEM: &str = "You are a professional translator for an online \
    magazine. Translate faithfully and naturally for native readers. \
    Keep proper nouns, brand names, numbers and URLs intact. \
    Respond with the translated text only: no preamble, no quotes, no notes.";

pub fn build_translation_prompt(text: &str, from: Lang, to: Lang, kind: TextKind) -> String {
    let mut prompt = format!(
        "Translate the following text from {} to {}.\n",
        from.english_name(),
        to.english_name()
    );
    if kind == TextKind::Html {
        prompt.push_str(PRESERVE_HTML_INSTRUCTION);
        prompt.push('\n');
    }
    prompt.push_str("\nText:\n");
    prompt.push_str(text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_prompt_carries_markup_instruction() {
        let p = build_translation_prompt("<p>夜</p>", Lang::Ja, Lang::Ko, TextKind::Html);
        assert!(p.contains("from Japanese to Korean"));
        assert!(p.contains("Keep every tag"));
        assert!(p.ends_with("<p>夜</p>"));

        let p = build_translation_prompt("夜", Lang::Ja, Lang::En, TextKind::Plain);
        assert!(!p.contains("Keep every tag"));
    }
}
