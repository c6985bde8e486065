//! Translation pipeline.
//!
//! Fills the non-source language slots of `Localized` fields. Languages are
//! translated concurrently per field. A failed call is logged and recorded in
//! the `TranslationReport`; it never aborts the remaining work, and the target
//! slot keeps whatever value it had before.
//!
//! `AppState` holds an `Arc<dyn Translator>`; the LLM-backed implementation is
//! the default and tests use in-memory fakes.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::i18n::{Lang, Localized};
use crate::llm_client::{LlmClient, LlmError};

pub mod prompts;

use prompts::{build_translation_prompt, TRANSLATION_SYSTEM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    Html,
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        from: Lang,
        to: Lang,
        kind: TextKind,
    ) -> Result<String, LlmError>;
}

pub struct LlmTranslator(pub LlmClient);

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Lang,
        to: Lang,
        kind: TextKind,
    ) -> Result<String, LlmError> {
        let prompt = build_translation_prompt(text, from, to, kind);
        self.0.call_text(&prompt, TRANSLATION_SYSTEM).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedField {
    pub field: String,
    pub lang: Lang,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationFailure {
    pub field: String,
    pub lang: Lang,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationReport {
    pub translated: Vec<TranslatedField>,
    pub failed: Vec<TranslationFailure>,
}

impl TranslationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merge(&mut self, other: TranslationReport) {
        self.translated.extend(other.translated);
        self.failed.extend(other.failed);
    }
}

/// A named field to translate in place.
pub struct FieldJob<'a> {
    pub name: &'static str,
    pub value: &'a mut Localized,
    pub kind: TextKind,
}

impl<'a> FieldJob<'a> {
    pub fn plain(name: &'static str, value: &'a mut Localized) -> Self {
        Self {
            name,
            value,
            kind: TextKind::Plain,
        }
    }

    pub fn html(name: &'static str, value: &'a mut Localized) -> Self {
        Self {
            name,
            value,
            kind: TextKind::Html,
        }
    }
}

/// Translates one field into every target language that is missing (or all
/// of them when `force` is set). An empty source is left alone.
pub async fn translate_localized(
    translator: &dyn Translator,
    job: FieldJob<'_>,
    force: bool,
) -> TranslationReport {
    let mut report = TranslationReport::default();
    let source = job.value.get(Lang::SOURCE).trim().to_string();
    if source.is_empty() {
        return report;
    }

    let targets: Vec<Lang> = Lang::targets()
        .filter(|lang| force || job.value.is_missing(*lang))
        .collect();

    let kind = job.kind;
    let results = join_all(targets.iter().map(|&lang| {
        let source = source.as_str();
        async move {
            let result = translator.translate(source, Lang::SOURCE, lang, kind).await;
            (lang, result)
        }
    }))
    .await;

    for (lang, result) in results {
        match result {
            Ok(text) if !text.trim().is_empty() => {
                job.value.set(lang, text);
                report.translated.push(TranslatedField {
                    field: job.name.to_string(),
                    lang,
                });
            }
            Ok(_) => {
                warn!("Translation of '{}' into {lang} came back empty", job.name);
                report.failed.push(TranslationFailure {
                    field: job.name.to_string(),
                    lang,
                    error: LlmError::EmptyContent.to_string(),
                });
            }
            Err(e) => {
                warn!("Translation of '{}' into {lang} failed: {e}", job.name);
                report.failed.push(TranslationFailure {
                    field: job.name.to_string(),
                    lang,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

/// Runs `translate_localized` over several fields, one after another.
pub async fn translate_fields(
    translator: &dyn Translator,
    jobs: Vec<FieldJob<'_>>,
    force: bool,
) -> TranslationReport {
    let mut report = TranslationReport::default();
    for job in jobs {
        report.merge(translate_localized(translator, job, force).await);
    }
    info!(
        "Translation finished: {} translated, {} failed",
        report.translated.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Prefixes text with the target code; fails for the languages in `fail_for`.
    #[derive(Default)]
    pub struct FakeTranslator {
        pub fail_for: Vec<Lang>,
        pub calls: AtomicUsize,
    }

    impl FakeTranslator {
        pub fn failing(fail_for: Vec<Lang>) -> Self {
            Self {
                fail_for,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            text: &str,
            _from: Lang,
            to: Lang,
            _kind: TextKind,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_for.contains(&to) {
                return Err(LlmError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(format!("[{to}] {text}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTranslator;
    use super::*;

    #[tokio::test]
    async fn test_fills_missing_languages_only() {
        let translator = FakeTranslator::default();
        let mut title = Localized::source("夜");
        title.set(Lang::En, "Night");

        let report =
            translate_localized(&translator, FieldJob::plain("title", &mut title), false).await;

        assert_eq!(title.en, "Night");
        assert_eq!(title.zh, "[zh] 夜");
        assert_eq!(title.ko, "[ko] 夜");
        assert_eq!(report.translated.len(), 2);
        assert!(report.is_complete());
        assert_eq!(translator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_force_overwrites_existing_translations() {
        let translator = FakeTranslator::default();
        let mut title = Localized::source("夜");
        title.set(Lang::En, "Night");

        translate_localized(&translator, FieldJob::plain("title", &mut title), true).await;

        assert_eq!(title.en, "[en] 夜");
        assert_eq!(translator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_not_fatal() {
        let translator = FakeTranslator::failing(vec![Lang::Zh]);
        let mut title = Localized::source("夜");
        let mut body = Localized::source("<p>本文</p>");

        let report = translate_fields(
            &translator,
            vec![
                FieldJob::plain("title", &mut title),
                FieldJob::html("content", &mut body),
            ],
            false,
        )
        .await;

        assert_eq!(report.translated.len(), 4);
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.iter().all(|f| f.lang == Lang::Zh));
        assert!(title.zh.is_empty());
        assert_eq!(body.ko, "[ko] <p>本文</p>");
    }

    #[tokio::test]
    async fn test_empty_source_is_skipped() {
        let translator = FakeTranslator::default();
        let mut excerpt = Localized::default();
        excerpt.set(Lang::En, "orphan");

        let report =
            translate_localized(&translator, FieldJob::plain("excerpt", &mut excerpt), true).await;

        assert!(report.translated.is_empty());
        assert_eq!(excerpt.en, "orphan");
        assert_eq!(translator.call_count(), 0);
    }
}
