//! # bookweave
//!
//! Document decomposition and reassembly for translation pipelines.
//!
//! A structure extractor reports, per page, text lines with font samples,
//! table grids, image regions and vector lines. bookweave segments that
//! output into typed content units (text runs, tables, images, lines),
//! lets a translation collaborator fill in each unit, and writes the
//! translated book back out as PDF or Markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookweave::{Bookweave, OutputFormat, TranslationRequest, TranslationResponse};
//!
//! fn main() -> bookweave::Result<()> {
//!     let mut result = Bookweave::new()
//!         .with_pages(2)
//!         .segment("structure.json", "docs/report.pdf")?;
//!
//!     let mut translator = |req: &TranslationRequest<'_>| -> bookweave::Result<TranslationResponse> {
//!         Ok(TranslationResponse::new(req.original.to_uppercase(), true))
//!     };
//!     result.translate(&mut translator);
//!
//!     // Writes docs/report_translated.md
//!     result.save(None, OutputFormat::Markdown)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`parser`]: structure extractor seam and page segmentation
//! - [`model`]: content units, pages and books
//! - [`translate`]: translation driver over a [`Translator`]
//! - [`render`]: PDF, Markdown and JSON output

pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod render;
pub mod translate;

// Re-export commonly used types
pub use error::{Error, Result};
pub use logging::Logger;
pub use model::{
    BBox, Book, Color, Content, ContentType, ImageContent, LineContent, Page, TableContent,
    TableGrid, TextContent, TextStyle, Translation,
};
pub use parser::{BookParser, ErrorMode, JsonExtractor, ParseOptions, StructureExtractor};
pub use render::{
    BookWriter, JsonFormat, OutputFormat, PageSize, RenderOptions, RenderResult, RenderStats,
};
pub use translate::{
    BookTranslator, TranslationRequest, TranslationResponse, TranslationSummary, Translator,
};

use std::path::{Path, PathBuf};

/// Segment a document from its serialized extractor dump.
///
/// # Arguments
///
/// * `structure` - Path to the extractor dump (`{"pages": [...]}`)
/// * `source` - Path of the document the dump describes
///
/// # Example
///
/// ```no_run
/// use bookweave::segment_file;
///
/// let book = segment_file("structure.json", "report.pdf").unwrap();
/// println!("Pages: {}", book.page_count());
/// ```
pub fn segment_file<P: AsRef<Path>, S: AsRef<Path>>(structure: P, source: S) -> Result<Book> {
    segment_file_with_options(structure, source, ParseOptions::default())
}

/// Segment a document with custom options.
///
/// # Example
///
/// ```no_run
/// use bookweave::{segment_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().with_pages(3);
/// let book = segment_file_with_options("structure.json", "report.pdf", options).unwrap();
/// ```
pub fn segment_file_with_options<P: AsRef<Path>, S: AsRef<Path>>(
    structure: P,
    source: S,
    options: ParseOptions,
) -> Result<Book> {
    BookParser::open_with_options(structure, options)?.parse(source)
}

/// Write a translated book, deriving the output path from the source when
/// `output` is `None`.
pub fn render_book(book: &Book, output: Option<&Path>, format: OutputFormat) -> Result<RenderResult> {
    BookWriter::default().save(book, output, format)
}

/// Builder for segmenting, translating and rendering a document.
///
/// # Example
///
/// ```no_run
/// use bookweave::{Bookweave, OutputFormat};
///
/// let result = Bookweave::new()
///     .lenient()
///     .with_image_dir("./images")
///     .with_font("fonts/NotoSansSC-Regular.ttf")
///     .segment("structure.json", "report.pdf")?;
/// result.save(None, OutputFormat::Pdf)?;
/// # Ok::<(), bookweave::Error>(())
/// ```
pub struct Bookweave {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    logger: Logger,
}

impl Bookweave {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            logger: Logger::global(),
        }
    }

    /// Enable lenient segmentation mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Segment only the first `pages` pages.
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.parse_options = self.parse_options.with_images(extract);
        self
    }

    /// Set image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parse_options = self.parse_options.with_image_dir(dir);
        self
    }

    /// Embed a TrueType font in PDF output.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.render_options = self.render_options.with_font(path);
        self
    }

    /// Set the PDF page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.render_options = self.render_options.with_page_size(size);
        self
    }

    /// Route log records to the given logger.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Segment a document from its extractor dump.
    pub fn segment<P: AsRef<Path>, S: AsRef<Path>>(
        self,
        structure: P,
        source: S,
    ) -> Result<BookweaveResult> {
        let extractor = JsonExtractor::open(structure)?;
        self.segment_with(extractor, source)
    }

    /// Segment a document through any structure extractor.
    pub fn segment_with<E: StructureExtractor, S: AsRef<Path>>(
        self,
        extractor: E,
        source: S,
    ) -> Result<BookweaveResult> {
        let book = BookParser::with_options(extractor, self.parse_options)
            .with_logger(self.logger.clone())
            .parse(source)?;
        Ok(BookweaveResult {
            book,
            render_options: self.render_options,
            logger: self.logger,
        })
    }
}

impl Default for Bookweave {
    fn default() -> Self {
        Self::new()
    }
}

/// A segmented book with the settings to translate and render it.
pub struct BookweaveResult {
    /// The segmented book
    pub book: Book,
    render_options: RenderOptions,
    logger: Logger,
}

impl BookweaveResult {
    /// Translate every translatable unit.
    pub fn translate<T: Translator + ?Sized>(&mut self, translator: &mut T) -> TranslationSummary {
        BookTranslator::new(self.logger.clone()).translate(&mut self.book, translator)
    }

    /// Write the book as PDF or Markdown.
    pub fn save(&self, output: Option<&Path>, format: OutputFormat) -> Result<RenderResult> {
        BookWriter::new(self.render_options.clone(), self.logger.clone()).save(
            &self.book,
            output,
            format,
        )
    }

    /// Render the translated book as Markdown.
    pub fn to_markdown(&self) -> String {
        render::MarkdownRenderer::new(self.logger.clone())
            .render(&self.book)
            .0
    }

    /// Serialize the book to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.book, format)
    }

    /// Get the book.
    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn into_book(self) -> Book {
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RawPage;

    #[test]
    fn test_bookweave_builder() {
        let builder = Bookweave::new()
            .lenient()
            .with_pages(2)
            .with_images(false)
            .with_page_size(PageSize::A4);

        assert_eq!(builder.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(builder.parse_options.pages, Some(2));
        assert!(!builder.parse_options.extract_images);
        assert_eq!(builder.render_options.page_size, PageSize::A4);
    }

    #[test]
    fn test_bookweave_builder_default() {
        let builder = Bookweave::default();
        assert_eq!(builder.parse_options.error_mode, ErrorMode::Strict);
        assert!(builder.render_options.font_path.is_none());
    }

    #[test]
    fn test_segment_missing_dump() {
        let result = segment_file("/nonexistent/structure.json", "a.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_segment_with_extractor() {
        let extractor = JsonExtractor::from_pages(vec![RawPage::default(), RawPage::default()]);
        let result = Bookweave::new()
            .with_pages(1)
            .segment_with(extractor, "a.pdf")
            .unwrap();
        assert_eq!(result.book().page_count(), 1);
        assert_eq!(result.to_markdown(), "");
    }
}
