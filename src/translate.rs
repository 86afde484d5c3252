//! Translation driver.
//!
//! The translation itself is done by an external collaborator behind the
//! [`Translator`] trait. [`BookTranslator`] walks a book, asks the
//! translator for every TEXT and TABLE unit that has no translation yet, and
//! writes the answers back through each unit's checked setter.

use std::borrow::Cow;

use crate::error::Result;
use crate::logging::Logger;
use crate::model::{Book, Content, ContentType, TextStyle, Translation};

/// What the translator is asked to translate.
#[derive(Debug, Clone)]
pub struct TranslationRequest<'a> {
    /// Page the unit sits on (1-indexed)
    pub page: u32,

    /// Type of the unit
    pub content_type: ContentType,

    /// Original text; tables are given as space-aligned columns
    pub original: Cow<'a, str>,

    /// Font context of the unit
    pub style: Option<&'a TextStyle>,
}

/// A translator's answer for one unit.
#[derive(Debug, Clone)]
pub struct TranslationResponse {
    pub value: Translation,

    /// Whether the unit should be rendered
    pub status: bool,
}

impl TranslationResponse {
    pub fn new(value: impl Into<Translation>, status: bool) -> Self {
        Self {
            value: value.into(),
            status,
        }
    }
}

/// The translation collaborator.
pub trait Translator {
    fn translate(&mut self, request: &TranslationRequest<'_>) -> Result<TranslationResponse>;
}

impl<F> Translator for F
where
    F: FnMut(&TranslationRequest<'_>) -> Result<TranslationResponse>,
{
    fn translate(&mut self, request: &TranslationRequest<'_>) -> Result<TranslationResponse> {
        self(request)
    }
}

/// Outcome counts of a [`BookTranslator::translate`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Units that ended up renderable
    pub translated: usize,
    /// Units whose translation failed or was rejected
    pub failed: usize,
    /// Units skipped because they already had a translation
    pub skipped: usize,
}

/// Fills the translation slot of every translatable unit in a book.
#[derive(Debug, Clone, Default)]
pub struct BookTranslator {
    logger: Logger,
}

impl BookTranslator {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Translate every TEXT and TABLE unit of `book`.
    ///
    /// A failure on one unit is logged and counted; it never stops the
    /// remaining units or pages.
    pub fn translate<T: Translator + ?Sized>(
        &self,
        book: &mut Book,
        translator: &mut T,
    ) -> TranslationSummary {
        let mut summary = TranslationSummary::default();

        for page in book.pages_mut() {
            let number = page.number;
            for (index, content) in page.contents_mut().iter_mut().enumerate() {
                if !content.is_translatable() {
                    continue;
                }
                if has_translation(content) {
                    summary.skipped += 1;
                    continue;
                }

                match self.translate_unit(number, content, translator) {
                    Ok(()) if content.status() => summary.translated += 1,
                    Ok(()) => summary.failed += 1,
                    Err(e) => {
                        self.logger.warn(format_args!(
                            "Translation of {} unit {} on page {} failed: {}",
                            content.content_type(),
                            index,
                            number,
                            e
                        ));
                        summary.failed += 1;
                    }
                }
            }
        }

        self.logger.info(format_args!(
            "Translation finished: {} translated, {} failed, {} skipped",
            summary.translated, summary.failed, summary.skipped
        ));
        summary
    }

    fn translate_unit<T: Translator + ?Sized>(
        &self,
        page: u32,
        content: &mut Content,
        translator: &mut T,
    ) -> Result<()> {
        let response = {
            let request = TranslationRequest {
                page,
                content_type: content.content_type(),
                original: content.original_text().unwrap_or_default(),
                style: content.style(),
            };
            translator.translate(&request)?
        };
        content.set_translation(response.value, response.status, &self.logger)
    }
}

fn has_translation(content: &Content) -> bool {
    match content {
        Content::Text(t) => t.translation().is_some(),
        Content::Table(t) => t.translation().is_some(),
        Content::Image(i) => i.translation().is_some(),
        Content::Line(_) => false,
    }
}
